//! Integration tests for detection and moves against a real directory tree

#[cfg(test)]
mod resort_integration_tests {
    use futures_lite::future::block_on;
    use resort_core::fs::{FileSystem, RealFileSystem, SyncToAsyncFs};
    use resort_core::policy::FolderPolicy;
    use resort_core::{AttachmentResorter, MoveSelection, ResortPair, SelectionPlan};
    use std::path::Path;
    use tempfile::TempDir;

    type Resorter = AttachmentResorter<SyncToAsyncFs<RealFileSystem>, FolderPolicy>;

    fn write(root: &Path, path: &str, content: &[u8]) {
        RealFileSystem.write_binary(&root.join(path), content).unwrap();
    }

    fn read(root: &Path, path: &str) -> Vec<u8> {
        RealFileSystem.read_binary(&root.join(path)).unwrap()
    }

    fn resorter(root: &Path) -> Resorter {
        let policy = FolderPolicy {
            folder_name: "${notename}/assets".to_string(),
            ..Default::default()
        };
        AttachmentResorter::new(SyncToAsyncFs::new(RealFileSystem), root, policy)
    }

    fn detect(resorter: &mut Resorter) -> Vec<ResortPair> {
        let mut pairs = block_on(resorter.detect_resort_pairs()).unwrap();
        pairs.sort_by(|a, b| a.current_path.cmp(&b.current_path));
        pairs
    }

    fn candidate_folders(pair: &ResortPair) -> Vec<&str> {
        pair.candidates.iter().map(|c| c.folder.as_str()).collect()
    }

    /// Docs/A.md, Docs/B.md and Docs/C.md with canonical folders Docs/{A,B,C}/assets.
    fn drifted_vault() -> TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(root, "Docs/A.md", b"# A\n![[own.png]]\nSee [[loose.pdf]].\n");
        write(root, "Docs/B.md", b"---\ntitle: B\n---\n![[img.png|200]]\n");
        write(root, "Docs/C.md", b"[report](../loose.pdf)\n```\n![[unused.png]]\n```\n");
        write(root, "Docs/A/assets/own.png", b"own");
        write(root, "Docs/A/assets/img.png", b"img");
        write(root, "Docs/A/assets/unused.png", b"unused");
        write(root, "loose.pdf", b"pdf");
        write(root, ".obsidian/stray.png", b"ignored");
        tmp
    }

    #[test]
    fn test_detects_misplaced_and_loose_attachments() {
        let tmp = drifted_vault();
        let mut resorter = resorter(tmp.path());

        let pairs = detect(&mut resorter);

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].current_path, "Docs/A/assets/img.png");
        assert_eq!(pairs[0].current_folder, "Docs/A/assets");
        assert_eq!(candidate_folders(&pairs[0]), ["Docs/B/assets"]);

        assert_eq!(pairs[1].current_path, "loose.pdf");
        assert_eq!(pairs[1].current_folder, "");
        assert_eq!(candidate_folders(&pairs[1]), ["Docs/A/assets", "Docs/C/assets"]);
    }

    #[test]
    fn test_orphans_and_correctly_placed_files_are_not_reported() {
        let tmp = drifted_vault();
        let mut resorter = resorter(tmp.path());

        let pairs = detect(&mut resorter);

        for pair in &pairs {
            assert_ne!(pair.attachment, "unused.png");
            assert_ne!(pair.attachment, "own.png");
            assert_ne!(pair.attachment, "stray.png");
            assert!(!pair.is_in_place());
        }
    }

    #[test]
    fn test_detection_is_idempotent() {
        let tmp = drifted_vault();
        let mut resorter = resorter(tmp.path());

        let first = detect(&mut resorter);
        let second = detect(&mut resorter);

        assert_eq!(first, second);
    }

    #[test]
    fn test_applying_plan_settles_vault() {
        let tmp = drifted_vault();
        let root = tmp.path();
        let mut resorter = resorter(root);

        let plan = SelectionPlan::from_pairs(block_on(resorter.detect_resort_pairs()).unwrap());
        let report = block_on(resorter.execute_moves(&plan.into_selections()));

        assert_eq!(report.success_count(), 2);
        assert!(report.failures.is_empty());
        assert_eq!(read(root, "Docs/B/assets/img.png"), b"img");
        assert_eq!(read(root, "Docs/A/assets/loose.pdf"), b"pdf");
        assert!(!root.join("loose.pdf").exists());
        // Folder still holds own.png and unused.png
        assert!(root.join("Docs/A/assets").is_dir());

        assert!(detect(&mut resorter).is_empty());
    }

    #[test]
    fn test_collision_keeps_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(root, "Docs/A/assets/img.png", b"moved");
        write(root, "Docs/B/assets/img.png", b"existing");
        let resorter = resorter(root);

        let report = block_on(
            resorter.execute_moves(&[MoveSelection::new("Docs/A/assets/img.png", "Docs/B/assets")]),
        );

        assert_eq!(report.success_count(), 1);
        assert_eq!(report.moved[0].to, "Docs/B/assets/img (1).png");
        assert_eq!(read(root, "Docs/B/assets/img.png"), b"existing");
        assert_eq!(read(root, "Docs/B/assets/img (1).png"), b"moved");
        // The emptied source folder is cleaned up
        assert!(!root.join("Docs/A/assets").exists());
        assert!(root.join("Docs/A").is_dir());
    }

    #[test]
    fn test_same_location_is_not_counted() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(root, "Docs/B/assets/img.png", b"img");
        let resorter = resorter(root);

        let report = block_on(
            resorter.execute_moves(&[MoveSelection::new("Docs/B/assets/img.png", "Docs/B/assets")]),
        );

        assert_eq!(report.success_count(), 0);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(read(root, "Docs/B/assets/img.png"), b"img");
    }

    #[test]
    fn test_batch_continues_after_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(root, "in/one.png", b"1");
        write(root, "in/three.png", b"3");
        let resorter = resorter(root);

        let report = block_on(resorter.execute_moves(&[
            MoveSelection::new("in/one.png", "out"),
            MoveSelection::new("in/two.png", "out"),
            MoveSelection::new("in/three.png", "out"),
        ]));

        assert_eq!(report.success_count(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].file_name, "two.png");
        assert_eq!(read(root, "out/one.png"), b"1");
        assert_eq!(read(root, "out/three.png"), b"3");
        assert!(!root.join("in").exists());
    }

    #[test]
    fn test_missing_vault_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut resorter = resorter(&tmp.path().join("missing"));

        assert!(block_on(resorter.detect_resort_pairs()).is_err());
    }
}
