fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

// Fixture integers are little-endian.
#[cfg(all(test, unix, target_endian = "little"))]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use qfile_protocol::{RESULT_HEADER_SIZE, ResultHeader};
    use qfile_receiver::{Confinement, Confiner, Limits, Unpacker, report};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Fixture {
        description: String,
        /// Sender stream, hex encoded.
        input: String,
        status: u32,
        crc32: u32,
        /// Expected result header plus extension, hex encoded.
        output: String,
        #[serde(default)]
        tree: Vec<TreeEntry>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(tag = "kind", rename_all = "lowercase")]
    enum TreeEntry {
        File { path: String, content: String },
        Directory { path: String },
    }

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    fn load_fixture(name: &str) -> Option<Fixture> {
        let path = fixtures_dir().join(name);
        if !path.exists() {
            eprintln!("SKIP: fixture {name} not found");
            return None;
        }
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        let fixture = serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()));
        Some(fixture)
    }

    /// Feeds the fixture stream to a fresh receiver and compares the status
    /// bytes and the resulting tree.
    fn replay(name: &str) {
        let Some(fixture) = load_fixture(name) else {
            return;
        };
        let input = hex::decode(&fixture.input).expect("fixture input is hex");
        let expected_output = hex::decode(&fixture.output).expect("fixture output is hex");

        let tmp = tempfile::tempdir().unwrap();
        let confiner = Confiner::new(tmp.path(), Confinement::Strict).unwrap();
        let mut unpacker = Unpacker::new(input.as_slice(), confiner, Limits::unlimited());
        let outcome = unpacker.run();

        let mut output = Vec::new();
        let code = report(&mut output, &outcome, unpacker.session()).unwrap();

        assert_eq!(code, fixture.status, "{name}: {}", fixture.description);
        assert_eq!(
            unpacker.session().checksum(),
            fixture.crc32,
            "{name}: checksum mismatch"
        );
        assert_eq!(
            hex::encode(&output),
            hex::encode(&expected_output),
            "{name}: status bytes differ"
        );

        let header: [u8; RESULT_HEADER_SIZE] = output[..RESULT_HEADER_SIZE].try_into().unwrap();
        let header = ResultHeader::from_bytes(&header);
        assert_eq!(header.error_code, fixture.status);
        assert_eq!(header.crc32, fixture.crc32);

        check_tree(tmp.path(), &fixture.tree);
    }

    fn check_tree(root: &Path, tree: &[TreeEntry]) {
        for entry in tree {
            match entry {
                TreeEntry::File { path, content } => {
                    let data = fs::read(root.join(path))
                        .unwrap_or_else(|e| panic!("missing file {path}: {e}"));
                    assert_eq!(data, content.as_bytes(), "content of {path}");
                }
                TreeEntry::Directory { path } => {
                    assert!(root.join(path).is_dir(), "{path} should be a directory");
                }
            }
        }

        let expected = tree.len();
        let actual = walk_count(root);
        assert_eq!(actual, expected, "unexpected entries under the incoming dir");
    }

    fn walk_count(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| {
                let entry = entry.unwrap();
                let file_type = entry.file_type().unwrap();
                if file_type.is_dir() {
                    1 + walk_count(&entry.path())
                } else {
                    1
                }
            })
            .sum()
    }

    #[test]
    fn fixture_empty_session() {
        replay("empty_session.json");
    }

    #[test]
    fn fixture_file_and_directory() {
        replay("file_and_directory.json");
    }

    #[test]
    fn fixture_peer_closed() {
        replay("peer_closed.json");
    }

    #[test]
    fn fixture_duplicate_file() {
        replay("duplicate_file.json");
    }

    #[test]
    fn fixture_absolute_symlink() {
        replay("absolute_symlink.json");
    }

    #[test]
    fn fixture_unsupported_kind() {
        replay("unsupported_kind.json");
    }
}
