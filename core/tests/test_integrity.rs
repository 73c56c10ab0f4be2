#[cfg(test)]
mod tests {
    use localdata_core::context::StageContext;
    use localdata_core::integrity::{compute_digest, ensure_digest, verify_digest, IntegrityKind};
    use localdata_core::types::{FileResult, StoreError};
    use tokio_util::sync::CancellationToken;

    fn ctx(buffer_size: usize) -> StageContext {
        StageContext::new(buffer_size, CancellationToken::new())
    }

    async fn digest(kind: IntegrityKind, data: &[u8]) -> String {
        compute_digest(kind, data, &ctx(4096), &mut |_: f32| {}).await.unwrap()
    }

    #[tokio::test]
    async fn known_vectors_are_uppercase_hex() {
        assert_eq!(digest(IntegrityKind::Md5, b"").await, "D41D8CD98F00B204E9800998ECF8427E");
        assert_eq!(digest(IntegrityKind::Md5, b"abc").await, "900150983CD24FB0D6963F7D28E17F72");
        assert_eq!(
            digest(IntegrityKind::Sha1, b"abc").await,
            "A9993E364706816ABA3E25717850C26C9CD0D89D"
        );
        assert_eq!(
            digest(IntegrityKind::Sha256, b"abc").await,
            "BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD"
        );
        assert_eq!(digest(IntegrityKind::Sha512, b"abc").await.len(), 128);
    }

    #[tokio::test]
    async fn identity_kind_yields_empty_digest_and_always_verifies() {
        assert_eq!(digest(IntegrityKind::None, b"anything").await, "");
        let ok = verify_digest(IntegrityKind::None, b"anything", "DEADBEEF", &ctx(4096), &mut |_: f32| {})
            .await
            .unwrap();
        assert!(ok);
    }

    #[tokio::test]
    async fn digest_does_not_depend_on_chunk_size() {
        let data: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
        let whole = digest(IntegrityKind::Sha256, &data).await;
        for chunk in [1usize, 7, 4096, 65_536, 1 << 20] {
            let d = compute_digest(IntegrityKind::Sha256, &data, &ctx(chunk), &mut |_: f32| {})
                .await
                .unwrap();
            assert_eq!(d, whole, "chunk size {}", chunk);
        }
    }

    #[tokio::test]
    async fn progress_is_monotonic_and_ends_once_at_one() {
        let data = vec![7u8; 10_000];
        let mut seen = Vec::new();
        compute_digest(IntegrityKind::Sha1, &data, &ctx(1000), &mut |p: f32| seen.push(p))
            .await
            .unwrap();
        assert_eq!(seen.len(), 10);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.iter().filter(|&&p| p == 1.0).count(), 1);
        assert_eq!(*seen.last().unwrap(), 1.0);
    }

    #[tokio::test]
    async fn empty_input_reports_completion() {
        let mut seen = Vec::new();
        compute_digest(IntegrityKind::Md5, &[], &ctx(1024), &mut |p: f32| seen.push(p))
            .await
            .unwrap();
        assert_eq!(seen, vec![1.0]);
    }

    #[tokio::test]
    async fn verify_ignores_hex_case_and_detects_mismatch() {
        let lower = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        let c = ctx(4096);
        assert!(verify_digest(IntegrityKind::Sha256, b"abc", lower, &c, &mut |_: f32| {}).await.unwrap());
        assert!(!verify_digest(IntegrityKind::Sha256, b"abd", lower, &c, &mut |_: f32| {}).await.unwrap());

        let err = ensure_digest(IntegrityKind::Sha256, b"abd", lower, &c, &mut |_: f32| {})
            .await
            .unwrap_err();
        assert_eq!(err.classify(), FileResult::IntegrityFailure);
    }

    #[tokio::test]
    async fn cancelled_token_stops_hashing() {
        let token = CancellationToken::new();
        token.cancel();
        let c = StageContext::new(16, token);
        let err = compute_digest(IntegrityKind::Sha256, &[1u8; 64], &c, &mut |_: f32| {})
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Cancelled));
    }

    #[test]
    fn digest_lengths_match_kinds() {
        assert_eq!(IntegrityKind::None.digest_len(), 0);
        assert_eq!(IntegrityKind::Md5.digest_len(), 16);
        assert_eq!(IntegrityKind::Sha1.digest_len(), 20);
        assert_eq!(IntegrityKind::Sha256.digest_len(), 32);
        assert_eq!(IntegrityKind::Sha512.digest_len(), 64);
    }
}
