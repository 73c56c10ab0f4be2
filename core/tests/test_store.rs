// End-to-end behaviour of the store: round trips, tamper detection, secrets,
// cancellation, progress and the result taxonomy.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use localdata_core::codec::{BincodeCodec, JsonCodec, LocalData, ObjectCodec};
    use localdata_core::headers::{decode_header, FileHeader};
    use localdata_core::prelude::*;
    use localdata_core::storage::DirectoryProvider;
    use localdata_core::telemetry::Stage;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    const PASSWORD: &str = "0123456789012345";
    const SEED: &str = "0123456789012345";

    #[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
    struct Inner {
        id: u64,
        tags: Vec<String>,
    }

    #[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
    struct SaveGame {
        int_value: i32,
        string_value: String,
        float_value: f32,
        inner: Inner,
        reference: Option<Box<Inner>>,
        list: Vec<i64>,
        map: BTreeMap<String, f64>,
    }

    impl LocalData for SaveGame {
        fn signature(&self) -> String {
            "SaveGame".into()
        }
        fn version(&self) -> i32 {
            2
        }
    }

    /// Same layout as `SaveGame`, different signature.
    #[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
    struct OtherSave {
        int_value: i32,
        string_value: String,
        float_value: f32,
        inner: Inner,
        reference: Option<Box<Inner>>,
        list: Vec<i64>,
        map: BTreeMap<String, f64>,
    }

    impl LocalData for OtherSave {
        fn signature(&self) -> String {
            "OtherSave".into()
        }
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Blob {
        bytes: Vec<u8>,
    }

    impl LocalData for Blob {
        fn signature(&self) -> String {
            "Blob".into()
        }
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn save() -> SaveGame {
        let mut map = BTreeMap::new();
        map.insert("gold".to_string(), 1250.5);
        map.insert("xp".to_string(), 99.0);
        SaveGame {
            int_value: 50,
            string_value: "All your base are belong to us".into(),
            float_value: 3.14159265,
            inner: Inner { id: 7, tags: vec!["a".into(), "bc".into()] },
            reference: Some(Box::new(Inner { id: 8, tags: vec![] })),
            list: vec![1, -2, 3, i64::MAX],
            map,
        }
    }

    fn blob(len: usize) -> Blob {
        Blob { bytes: (0..len).map(|i| (i % 241) as u8 ^ (i >> 12) as u8).collect() }
    }

    fn store() -> (TempDir, LocalStore) {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        (dir, store)
    }

    fn password_for(kind: EncryptionKind) -> &'static str {
        if kind == EncryptionKind::Des { "abcdefgh" } else { PASSWORD }
    }

    fn full_config() -> PipelineConfig {
        PipelineConfig::new()
            .with_integrity(IntegrityKind::Sha256)
            .with_compression(CompressionKind::GZip, CompressionLevel::Fastest)
            .with_encryption(EncryptionKind::Aes, PASSWORD, SEED)
    }

    fn assert_progress(seen: &[f32]) {
        assert!(!seen.is_empty());
        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "not monotonic: {:?}", seen);
        assert!(seen.iter().all(|p| (0.0..=1.0).contains(p)));
        assert_eq!(seen.iter().filter(|&&p| p == 1.0).count(), 1, "{:?}", seen);
        assert_eq!(*seen.last().unwrap(), 1.0);
    }

    #[tokio::test]
    async fn concrete_scenario_roundtrips() {
        let (_dir, store) = store();
        let config = full_config();
        let original = save();

        let mut write_progress = Vec::new();
        let write_done = AtomicUsize::new(0);
        let outcome = store
            .write(
                &original,
                "slot.sav",
                &config,
                Callbacks::none()
                    .on_progress(|p| write_progress.push(p))
                    .on_complete(|o: &WriteOutcome| {
                        assert_eq!(o.result, FileResult::Ok);
                        write_done.fetch_add(1, Ordering::SeqCst);
                    }),
            )
            .unwrap()
            .await;
        assert_eq!(outcome.result, FileResult::Ok);
        assert_eq!(write_done.load(Ordering::SeqCst), 1);
        assert_progress(&write_progress);
        assert!(store.exists("slot.sav"));

        let mut read_progress = Vec::new();
        let read_done = AtomicUsize::new(0);
        let loaded: ReadOutcome<SaveGame> = store
            .read(
                "slot.sav",
                &config,
                Callbacks::none()
                    .on_progress(|p| read_progress.push(p))
                    .on_complete(|_| {
                        read_done.fetch_add(1, Ordering::SeqCst);
                    }),
            )
            .unwrap()
            .await;
        assert_eq!(loaded.result, FileResult::Ok);
        assert_eq!(loaded.version, Some(2));
        assert_eq!(read_done.load(Ordering::SeqCst), 1);
        assert_progress(&read_progress);

        let value = loaded.into_value().unwrap();
        assert_eq!(value.int_value, 50);
        assert_eq!(value.string_value, "All your base are belong to us");
        assert_eq!(value.float_value, 3.14159265f32);
        assert_eq!(value, original);
    }

    #[tokio::test]
    async fn every_stage_combination_roundtrips() {
        let (_dir, store) = store();
        let original = save();
        let integrities = [
            IntegrityKind::None,
            IntegrityKind::Md5,
            IntegrityKind::Sha1,
            IntegrityKind::Sha256,
            IntegrityKind::Sha512,
        ];
        let compressions = [CompressionKind::None, CompressionKind::Zip, CompressionKind::GZip, CompressionKind::Brotli];
        let ciphers = [
            EncryptionKind::None,
            EncryptionKind::Aes,
            EncryptionKind::Des,
            EncryptionKind::TripleDes,
            EncryptionKind::Rc2,
        ];

        for integrity in integrities {
            for compression in compressions {
                for encryption in ciphers {
                    let config = PipelineConfig::new()
                        .with_buffer_size_kb(4)
                        .with_integrity(integrity)
                        .with_compression(compression, CompressionLevel::Optimal)
                        .with_encryption(encryption, password_for(encryption), SEED);
                    let name = format!("{}-{}-{}.sav", integrity, compression, encryption);

                    let w = store.write(&original, &name, &config, Callbacks::none()).unwrap().await;
                    assert_eq!(w.result, FileResult::Ok, "{}", name);

                    let r: ReadOutcome<SaveGame> = store.read(&name, &config, Callbacks::none()).unwrap().await;
                    assert_eq!(r.result, FileResult::Ok, "{}", name);
                    assert_eq!(r.value.as_ref(), Some(&original), "{}", name);
                }
            }
        }
    }

    #[tokio::test]
    async fn identity_stages_add_only_header_overhead() {
        let (dir, store) = store();
        let original = save();
        let config = PipelineConfig::new();

        let w = store.write(&original, "plain.sav", &config, Callbacks::none()).unwrap().await;
        assert_eq!(w.result, FileResult::Ok);

        let serialized = BincodeCodec.encode(&original).unwrap();
        let header = FileHeader {
            signature: "SaveGame".into(),
            integrity: IntegrityKind::None,
            compression: CompressionKind::None,
            encryption: EncryptionKind::None,
            hash: String::new(),
            uncompressed_size: serialized.len() as i32,
            version: 2,
        };
        let file = std::fs::read(dir.path().join("plain.sav")).unwrap();
        assert_eq!(file.len(), serialized.len() + header.encoded_len());
        assert_eq!(&file[header.encoded_len()..], &serialized[..]);
        assert_eq!(w.telemetry.bytes_file, file.len() as u64);

        let r: ReadOutcome<SaveGame> = store.read("plain.sav", &config, Callbacks::none()).unwrap().await;
        assert_eq!(r.value, Some(original));
    }

    async fn tamper_every_payload_byte(config: PipelineConfig, allowed: &[FileResult]) {
        let (dir, store) = store();
        let original = save();
        let w = store.write(&original, "orig.sav", &config, Callbacks::none()).unwrap().await;
        assert_eq!(w.result, FileResult::Ok);

        let bytes = std::fs::read(dir.path().join("orig.sav")).unwrap();
        let (_, payload_at) = decode_header(&bytes).unwrap();
        for i in payload_at..bytes.len() {
            let mut tampered = bytes.clone();
            tampered[i] ^= 0xFF;
            std::fs::write(dir.path().join("tampered.sav"), &tampered).unwrap();

            let r: ReadOutcome<SaveGame> = store.read("tampered.sav", &config, Callbacks::none()).unwrap().await;
            match r.result {
                FileResult::Ok => assert_eq!(r.value.as_ref(), Some(&original), "byte {} gave a wrong object", i),
                other => {
                    assert!(allowed.contains(&other), "byte {}: {:?}", i, other);
                    assert!(r.value.is_none());
                }
            }
        }
    }

    #[tokio::test]
    async fn tampered_plain_payload_is_always_an_integrity_failure() {
        let config = PipelineConfig::new().with_integrity(IntegrityKind::Sha256);
        let (dir, store) = store();
        let original = save();
        store.write(&original, "orig.sav", &config, Callbacks::none()).unwrap().await;

        let bytes = std::fs::read(dir.path().join("orig.sav")).unwrap();
        let (_, payload_at) = decode_header(&bytes).unwrap();
        for i in payload_at..bytes.len() {
            let mut tampered = bytes.clone();
            tampered[i] ^= 0x01;
            std::fs::write(dir.path().join("tampered.sav"), &tampered).unwrap();

            let r: ReadOutcome<SaveGame> = store.read("tampered.sav", &config, Callbacks::none()).unwrap().await;
            assert_eq!(r.result, FileResult::IntegrityFailure, "byte {}", i);
            assert!(r.value.is_none());
        }
    }

    #[tokio::test]
    async fn tampered_compressed_payload_never_yields_a_wrong_object() {
        for compression in [CompressionKind::Zip, CompressionKind::GZip] {
            let config = PipelineConfig::new()
                .with_integrity(IntegrityKind::Md5)
                .with_compression(compression, CompressionLevel::Optimal);
            tamper_every_payload_byte(config, &[FileResult::IntegrityFailure]).await;
        }
    }

    #[tokio::test]
    async fn tampered_ciphertext_never_yields_an_object() {
        let config = PipelineConfig::new()
            .with_integrity(IntegrityKind::Sha256)
            .with_encryption(EncryptionKind::Aes, PASSWORD, SEED);
        tamper_every_payload_byte(config, &[FileResult::IntegrityFailure, FileResult::DecryptionFailed]).await;
    }

    #[tokio::test]
    async fn wrong_password_is_a_distinct_failure() {
        let (_dir, store) = store();
        let original = save();
        for kind in [EncryptionKind::Aes, EncryptionKind::Des, EncryptionKind::TripleDes, EncryptionKind::Rc2] {
            let config = full_config().with_encryption(kind, password_for(kind), SEED);
            store.write(&original, "locked.sav", &config, Callbacks::none()).unwrap().await;

            let wrong_pw = if kind == EncryptionKind::Des { "hgfedcba" } else { "not-the-password" };
            for wrong in [
                full_config().with_encryption(kind, wrong_pw, SEED),
                full_config().with_encryption(kind, password_for(kind), "fedcba9876543210"),
            ] {
                let r: ReadOutcome<SaveGame> = store.read("locked.sav", &wrong, Callbacks::none()).unwrap().await;
                assert!(
                    matches!(r.result, FileResult::DecryptionFailed | FileResult::IntegrityFailure),
                    "{}: {:?}",
                    kind,
                    r.result
                );
                assert!(r.value.is_none());
            }
        }
    }

    #[tokio::test]
    async fn cancelled_write_leaves_no_file() {
        let (dir, store) = store();
        let big = blob(1 << 20);
        let config = PipelineConfig::new().with_buffer_size_kb(4);

        let mut seen = Vec::new();
        let done = AtomicUsize::new(0);
        let w = store
            .write(
                &big,
                "big.sav",
                &config,
                Callbacks::none()
                    .on_progress(|p| {
                        seen.push(p);
                        if p >= 0.5 {
                            store.cancel();
                        }
                    })
                    .on_complete(|_| {
                        done.fetch_add(1, Ordering::SeqCst);
                    }),
            )
            .unwrap()
            .await;

        assert_eq!(w.result, FileResult::Cancelled);
        assert!(!store.exists("big.sav"));
        assert!(!dir.path().join("big.sav").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        assert!(!store.is_busy());
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert_progress(&seen);
    }

    #[tokio::test]
    async fn cancel_before_file_stage_keeps_previous_file() {
        let (_dir, store) = store();
        let original = save();
        let config = PipelineConfig::new().with_integrity(IntegrityKind::Sha1);
        store.write(&original, "keep.sav", &config, Callbacks::none()).unwrap().await;

        let mut changed = save();
        changed.int_value = 51;
        let w = store
            .write(
                &changed,
                "keep.sav",
                &config,
                Callbacks::none().on_progress(|p| {
                    if p > 0.0 {
                        store.cancel();
                    }
                }),
            )
            .unwrap()
            .await;
        assert_eq!(w.result, FileResult::Cancelled);

        let r: ReadOutcome<SaveGame> = store.read("keep.sav", &config, Callbacks::none()).unwrap().await;
        assert_eq!(r.value, Some(original));
    }

    #[tokio::test]
    async fn cancelled_overwrite_keeps_previous_save() {
        let (dir, store) = store();
        let config = PipelineConfig::new().with_buffer_size_kb(4);
        let small = blob(1000);
        let w = store.write(&small, "keep.sav", &config, Callbacks::none()).unwrap().await;
        assert_eq!(w.result, FileResult::Ok);

        let big = blob(1 << 20);
        let w = store
            .write(
                &big,
                "keep.sav",
                &config,
                Callbacks::none().on_progress(|p| {
                    if p >= 0.5 {
                        store.cancel();
                    }
                }),
            )
            .unwrap()
            .await;
        assert_eq!(w.result, FileResult::Cancelled);

        assert!(store.exists("keep.sav"));
        let r: ReadOutcome<Blob> = store.read("keep.sav", &config, Callbacks::none()).unwrap().await;
        assert_eq!(r.result, FileResult::Ok);
        assert!(r.value.as_ref() == Some(&small));

        // Only the target is left, no temp file next to it.
        let left: Vec<_> = std::fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(left, vec![std::ffi::OsString::from("keep.sav")]);
    }

    #[tokio::test]
    async fn failed_write_reports_exception_and_releases_store() {
        let (dir, store) = store();
        std::fs::create_dir(dir.path().join("slot.sav")).unwrap();

        let mut seen = Vec::new();
        let done = AtomicUsize::new(0);
        let w = store
            .write(
                &save(),
                "slot.sav",
                &full_config(),
                Callbacks::none()
                    .on_progress(|p| seen.push(p))
                    .on_complete(|o: &WriteOutcome| {
                        assert_eq!(o.result, FileResult::ExceptionRaised);
                        done.fetch_add(1, Ordering::SeqCst);
                    }),
            )
            .unwrap()
            .await;

        assert_eq!(w.result, FileResult::ExceptionRaised);
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert_progress(&seen);
        assert!(!store.is_busy());
        assert!(dir.path().join("slot.sav").is_dir());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1, "temp file left behind");

        // The store is usable again.
        let w = store.write(&save(), "other.sav", &full_config(), Callbacks::none()).unwrap().await;
        assert_eq!(w.result, FileResult::Ok);
    }

    #[tokio::test]
    async fn cancelled_read_returns_no_object() {
        let (_dir, store) = store();
        let config = PipelineConfig::new().with_buffer_size_kb(4);
        store.write(&blob(256 * 1024), "blob.sav", &config, Callbacks::none()).unwrap().await;

        let r: ReadOutcome<Blob> = store
            .read(
                "blob.sav",
                &config,
                Callbacks::none().on_progress(|p| {
                    if p > 0.1 {
                        store.cancel();
                    }
                }),
            )
            .unwrap()
            .await;
        assert_eq!(r.result, FileResult::Cancelled);
        assert!(r.value.is_none());
        assert!(store.exists("blob.sav"), "reads never delete");
    }

    #[tokio::test]
    async fn signature_mismatch_withholds_the_object() {
        let (_dir, store) = store();
        let config = full_config();
        store.write(&save(), "typed.sav", &config, Callbacks::none()).unwrap().await;

        let r: ReadOutcome<OtherSave> = store.read("typed.sav", &config, Callbacks::none()).unwrap().await;
        assert_eq!(r.result, FileResult::InvalidSignature);
        assert!(r.value.is_none());
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let (_dir, store) = store();
        let mut seen = Vec::new();
        let done = AtomicUsize::new(0);
        let r: ReadOutcome<SaveGame> = store
            .read(
                "nope.sav",
                &PipelineConfig::new(),
                Callbacks::none()
                    .on_progress(|p| seen.push(p))
                    .on_complete(|o: &ReadOutcome<SaveGame>| {
                        assert_eq!(o.result, FileResult::NotFound);
                        done.fetch_add(1, Ordering::SeqCst);
                    }),
            )
            .unwrap()
            .await;
        assert_eq!(r.result, FileResult::NotFound);
        assert!(r.value.is_none());
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert_progress(&seen);
    }

    #[tokio::test]
    async fn garbage_file_is_an_exception() {
        let (dir, store) = store();
        std::fs::write(dir.path().join("junk.sav"), [0xFFu8; 3]).unwrap();
        let r: ReadOutcome<SaveGame> = store.read("junk.sav", &PipelineConfig::new(), Callbacks::none()).unwrap().await;
        assert_eq!(r.result, FileResult::ExceptionRaised);
    }

    #[tokio::test]
    async fn second_operation_is_rejected_while_busy() {
        let (_dir, store) = store();
        let original = save();
        let config = PipelineConfig::new();

        let first = store.write(&original, "a.sav", &config, Callbacks::none()).unwrap();
        assert!(store.is_busy());
        assert!(matches!(
            store.write(&original, "b.sav", &config, Callbacks::none()),
            Err(StoreError::Busy)
        ));
        assert!(matches!(
            store.read::<SaveGame>("a.sav", &config, Callbacks::none()),
            Err(StoreError::Busy)
        ));

        assert_eq!(first.await.result, FileResult::Ok);
        assert!(!store.is_busy());

        // Dropping an unpolled operation frees the store as well.
        let pending = store.write(&original, "c.sav", &config, Callbacks::none()).unwrap();
        drop(pending);
        assert!(!store.is_busy());
        assert!(!store.exists("c.sav"));
    }

    #[tokio::test]
    async fn invalid_requests_fail_fast_without_callbacks() {
        let (_dir, store) = store();
        let fired = AtomicUsize::new(0);
        let value = save();
        let bad = PipelineConfig::new().with_buffer_size_kb(2);
        let res = store.write(
            &value,
            "x.sav",
            &bad,
            Callbacks::none()
                .on_progress(|_| {
                    fired.fetch_add(1, Ordering::SeqCst);
                })
                .on_complete(|_| {
                    fired.fetch_add(1, Ordering::SeqCst);
                }),
        );
        assert!(matches!(res, Err(StoreError::Config(_))));

        let des = PipelineConfig::new().with_encryption(EncryptionKind::Des, "toolongpassword", SEED);
        assert!(matches!(
            store.write(&save(), "x.sav", &des, Callbacks::none()),
            Err(StoreError::Config(_))
        ));
        assert!(matches!(
            store.write(&save(), "../escape.sav", &PipelineConfig::new(), Callbacks::none()),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.read::<SaveGame>("", &PipelineConfig::new(), Callbacks::none()),
            Err(StoreError::InvalidArgument(_))
        ));

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn write_creates_parent_directories() {
        let (dir, store) = store();
        let w = store
            .write(&save(), "profiles/p1/slot.sav", &full_config(), Callbacks::none())
            .unwrap()
            .await;
        assert_eq!(w.result, FileResult::Ok);
        assert!(dir.path().join("profiles/p1/slot.sav").is_file());
        assert!(store.exists("profiles/p1/slot.sav"));
    }

    #[tokio::test]
    async fn delete_and_exists() {
        let (_dir, store) = store();
        store.write(&save(), "d.sav", &PipelineConfig::new(), Callbacks::none()).unwrap().await;
        assert!(store.exists("d.sav"));
        assert!(store.delete("d.sav").unwrap());
        assert!(!store.exists("d.sav"));
        assert!(!store.delete("d.sav").unwrap());
    }

    #[tokio::test]
    async fn telemetry_reports_stage_sizes() {
        let (_dir, store) = store();
        let config = PipelineConfig::new()
            .with_integrity(IntegrityKind::Md5)
            .with_compression(CompressionKind::Brotli, CompressionLevel::Optimal);
        let w = store.write(&blob(200_000), "t.sav", &config, Callbacks::none()).unwrap().await;
        assert_eq!(w.result, FileResult::Ok);

        let t = &w.telemetry;
        assert!(t.bytes_serialized >= 200_000);
        assert!(t.bytes_compressed < t.bytes_serialized);
        assert_eq!(t.bytes_payload, t.bytes_compressed);
        assert!(t.bytes_file > t.bytes_payload);
        assert!(t.compression_ratio > 0.0 && t.compression_ratio < 1.0);
        assert!(t.stage_times.contains(Stage::Compress));
        assert!(t.sanity_check());
    }

    #[tokio::test]
    async fn json_codec_store_roundtrips() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::with_parts(DirectoryProvider::new(dir.path()), JsonCodec);
        let config = PipelineConfig::new()
            .with_integrity(IntegrityKind::Sha1)
            .with_compression(CompressionKind::Brotli, CompressionLevel::Fastest)
            .with_encryption(EncryptionKind::TripleDes, PASSWORD, SEED);

        let original = save();
        assert_eq!(store.write(&original, "j.sav", &config, Callbacks::none()).unwrap().await.result, FileResult::Ok);
        let r: ReadOutcome<SaveGame> = store.read("j.sav", &config, Callbacks::none()).unwrap().await;
        assert_eq!(r.value, Some(original));
    }

    async fn large_roundtrip(len: usize) {
        let (_dir, store) = store();
        let config = PipelineConfig::new()
            .with_buffer_size_kb(4)
            .with_integrity(IntegrityKind::Sha256)
            .with_compression(CompressionKind::GZip, CompressionLevel::Fastest)
            .with_encryption(EncryptionKind::Aes, PASSWORD, SEED);
        let original = blob(len);

        let w = store.write(&original, "large.sav", &config, Callbacks::none()).unwrap().await;
        assert_eq!(w.result, FileResult::Ok);
        let r: ReadOutcome<Blob> = store.read("large.sav", &config, Callbacks::none()).unwrap().await;
        assert_eq!(r.result, FileResult::Ok);
        assert!(r.value.as_ref() == Some(&original));
    }

    #[tokio::test]
    async fn large_object_streams_with_small_buffer() {
        large_roundtrip(8 << 20).await;
    }

    #[tokio::test]
    #[ignore = "100 MB; run with --ignored"]
    async fn hundred_megabyte_object_roundtrips() {
        large_roundtrip(100 << 20).await;
    }
}
