//! Property tests for ingest and reconstruct.

use proptest::prelude::*;
use tokio::runtime::Runtime;

use chunkvault_testkit::generators::{content, prefixed_filename, repetitive_content};
use chunkvault_testkit::{memory_vault, IngestCase};

fn runtime() -> Runtime {
    Runtime::new().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_round_trip(case: IngestCase) {
        let rt = runtime();
        let back = rt.block_on(async {
            let (vault, _, _) = memory_vault(case.chunk_size).await;
            let report = vault.ingest(&case.filename, case.content.clone()).await.unwrap();
            prop_assert_eq!(report.size, case.content.len() as u64);
            prop_assert_eq!(
                report.chunk_count,
                case.content.len().div_ceil(case.chunk_size)
            );
            Ok(vault.reconstruct(&case.filename).await.unwrap())
        })?;
        prop_assert_eq!(back.as_ref(), case.content.as_slice());
    }

    #[test]
    fn test_second_ingest_writes_nothing(data in repetitive_content(8, 24)) {
        let rt = runtime();
        rt.block_on(async {
            let (vault, chunks, _) = memory_vault(8).await;
            let first = vault.ingest("a", data.clone()).await.unwrap();
            let blobs = chunks.len();
            prop_assert_eq!(first.chunks_written, blobs);
            prop_assert!(blobs <= 4);

            let second = vault.ingest("b", data.clone()).await.unwrap();
            prop_assert!(!second.new_chunks_written);
            prop_assert_eq!(second.signature, first.signature);
            prop_assert_eq!(chunks.len(), blobs);
            Ok(())
        })?;
    }

    #[test]
    fn test_path_prefix_ignored((raw, name) in prefixed_filename(), data in content(64)) {
        let rt = runtime();
        rt.block_on(async {
            let (vault, _, _) = memory_vault(16).await;
            let report = vault.ingest(&raw, data.clone()).await.unwrap();
            prop_assert_eq!(&report.filename, &name);
            prop_assert!(vault.contains(&name));
            let back = vault.reconstruct(&name).await.unwrap();
            prop_assert_eq!(back.as_ref(), data.as_slice());
            Ok(())
        })?;
    }
}
