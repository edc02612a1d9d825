use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use docstore::{CurrentStore, DocumentStore, LoadOptions, Separator, StoreError};

const SEP: &str = "<|RELATED_DOC_SEP_q7Lm2|>";

fn write(dir: &Path, name: &str, content: &[u8]) {
    fs::write(dir.join(name), content).unwrap();
}

fn literal(token: &str) -> LoadOptions {
    LoadOptions::with_separator(Separator::literal(token))
}

#[test]
fn test_hello_world_scenario() {
    let temp = tempdir().unwrap();
    write(temp.path(), "a.md", b"Hello<SEP>World");

    let store = DocumentStore::load_with(temp.path(), &literal("<SEP>")).unwrap();
    let doc = store.get("a").unwrap();
    assert_eq!(doc.id(), "a");
    assert_eq!(doc.segments(), ["Hello", "World"]);
}

#[test]
fn test_file_without_separator_is_one_segment() {
    let temp = tempdir().unwrap();
    let content = "# Title\n\nNo markers in here.\n";
    write(temp.path(), "b.md", content.as_bytes());

    let store = DocumentStore::load_with(temp.path(), &literal("<SEP>")).unwrap();
    assert_eq!(store.segments_of("b").unwrap(), [content]);
}

#[test]
fn test_duplicate_ids_fail_the_whole_load() {
    let temp = tempdir().unwrap();
    write(temp.path(), "a.md", b"markdown");
    write(temp.path(), "a.txt", b"text");
    write(temp.path(), "c.md", b"fine");

    let err = DocumentStore::load(temp.path()).unwrap_err();
    match err {
        StoreError::DuplicateId { id, first, second } => {
            assert_eq!(id, "a");
            assert_eq!(first.file_name().unwrap(), "a.md");
            assert_eq!(second.file_name().unwrap(), "a.txt");
        }
        other => panic!("expected DuplicateId, got {other:?}"),
    }
}

#[test]
fn test_missing_directory_is_not_found() {
    let temp = tempdir().unwrap();
    let err = DocumentStore::load(temp.path().join("absent")).unwrap_err();
    assert!(matches!(err, StoreError::DirectoryNotFound(_)));
    assert!(err.is_not_found());
}

#[test]
fn test_file_path_is_not_a_directory() {
    let temp = tempdir().unwrap();
    write(temp.path(), "a.md", b"x");
    let err = DocumentStore::load(temp.path().join("a.md")).unwrap_err();
    assert!(matches!(err, StoreError::NotADirectory(_)));
}

#[test]
fn test_non_utf8_file_fails_with_read_error() {
    let temp = tempdir().unwrap();
    write(temp.path(), "good.md", b"ok");
    write(temp.path(), "bad.md", &[0xff, 0xfe, 0x00, 0x80]);

    let err = DocumentStore::load(temp.path()).unwrap_err();
    match err {
        StoreError::Read { path, .. } => assert_eq!(path.file_name().unwrap(), "bad.md"),
        other => panic!("expected Read, got {other:?}"),
    }
}

#[test]
fn test_every_listed_id_resolves() {
    let temp = tempdir().unwrap();
    for name in ["00-2-1.md", "01-intro.md", "react-hooks.md"] {
        write(temp.path(), name, format!("body{SEP}extra").as_bytes());
    }

    let store = DocumentStore::load(temp.path()).unwrap();
    let ids = store.list_ids();
    assert_eq!(ids.len(), 3);
    for id in ids {
        let doc = store.get(id).unwrap();
        assert_eq!(doc.id(), id);
        assert!(doc.segment_count() >= 1);
    }
}

#[test]
fn test_round_trip_reproduces_raw_text() {
    let temp = tempdir().unwrap();
    let raw = format!("{SEP}lead\n\n{SEP}  middle  {SEP}{SEP}\ntrailing\n");
    write(temp.path(), "doc.md", raw.as_bytes());

    let store = DocumentStore::load(temp.path()).unwrap();
    let doc = store.get("doc").unwrap();
    assert_eq!(doc.segment_count(), 5);
    assert_eq!(doc.rejoin(store.separator().unwrap()), raw);
    assert_eq!(doc.raw_text(), raw);
}

#[test]
fn test_loading_twice_is_idempotent() {
    let temp = tempdir().unwrap();
    write(temp.path(), "z.md", format!("z{SEP}shared").as_bytes());
    write(temp.path(), "m.md", b"m only");
    write(temp.path(), "a.md", format!("a{SEP}shared").as_bytes());

    let first = DocumentStore::load(temp.path()).unwrap();
    let second = DocumentStore::load(temp.path()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.ids().collect::<Vec<_>>(),
        second.ids().collect::<Vec<_>>()
    );
    assert_eq!(first.ids().collect::<Vec<_>>(), ["a", "m", "z"]);
}

#[test]
fn test_discovered_separator_applies_to_all_documents() {
    let temp = tempdir().unwrap();
    write(temp.path(), "a.md", b"plain article");
    write(temp.path(), "b.md", format!("body b{SEP}appendix").as_bytes());
    write(temp.path(), "c.md", format!("body c{SEP}more{SEP}end").as_bytes());

    let store = DocumentStore::load(temp.path()).unwrap();
    assert_eq!(store.separator(), Some(SEP));
    assert_eq!(store.segments_of("a").unwrap().len(), 1);
    assert_eq!(store.segments_of("b").unwrap(), ["body b", "appendix"]);
    assert_eq!(store.segments_of("c").unwrap(), ["body c", "more", "end"]);
}

#[test]
fn test_prose_mention_of_marker_does_not_become_separator() {
    let temp = tempdir().unwrap();
    write(
        temp.path(),
        "00-guide.md",
        b"Blocks are delimited by a marker starting with `<|RELATED_DOC_SEP`.\n\nBody<|RELATED_DOC_SEP_k3|>Appendix",
    );
    write(temp.path(), "01-hooks.md", b"Hooks<|RELATED_DOC_SEP_k3|>Recap");

    let store = DocumentStore::load(temp.path()).unwrap();
    assert_eq!(store.separator(), Some("<|RELATED_DOC_SEP_k3|>"));
    assert_eq!(
        store.segments_of("00-guide").unwrap(),
        [
            "Blocks are delimited by a marker starting with `<|RELATED_DOC_SEP`.\n\nBody",
            "Appendix"
        ]
    );
    assert_eq!(store.segments_of("01-hooks").unwrap(), ["Hooks", "Recap"]);
}

#[test]
fn test_mismatched_marker_is_left_unsplit() {
    let temp = tempdir().unwrap();
    write(temp.path(), "a.md", format!("a{SEP}b").as_bytes());
    write(temp.path(), "b.md", b"x<|RELATED_DOC_SEP_other|>y");

    let store = DocumentStore::load(temp.path()).unwrap();
    assert_eq!(store.segments_of("a").unwrap().len(), 2);
    assert_eq!(store.segments_of("b").unwrap().len(), 1);
}

#[test]
fn test_subdirectories_and_hidden_files_are_skipped() {
    let temp = tempdir().unwrap();
    write(temp.path(), "visible.md", b"v");
    write(temp.path(), ".hidden.md", b"h");
    fs::create_dir(temp.path().join("nested")).unwrap();
    write(&temp.path().join("nested"), "inner.md", b"i");

    let store = DocumentStore::load(temp.path()).unwrap();
    assert_eq!(store.ids().collect::<Vec<_>>(), ["visible"]);

    let with_hidden = LoadOptions {
        include_hidden: true,
        ..LoadOptions::default()
    };
    let store = DocumentStore::load_with(temp.path(), &with_hidden).unwrap();
    assert_eq!(store.len(), 2);
    assert!(store.contains(".hidden"));
}

#[test]
fn test_extension_filter_avoids_collision() {
    let temp = tempdir().unwrap();
    write(temp.path(), "a.md", b"markdown");
    write(temp.path(), "a.txt", b"text");

    let options = LoadOptions {
        extensions: vec!["md".into()],
        ..LoadOptions::default()
    };
    let store = DocumentStore::load_with(temp.path(), &options).unwrap();
    assert_eq!(store.get("a").unwrap().raw_text(), "markdown");
}

#[test]
fn test_related_documents_share_segments() {
    let temp = tempdir().unwrap();
    write(temp.path(), "hooks.md", format!("Hooks{SEP}Closures recap").as_bytes());
    write(temp.path(), "closures.md", b"Closures recap");
    write(temp.path(), "ethics.md", b"Ethics");

    let store = DocumentStore::load(temp.path()).unwrap();
    assert_eq!(store.related("closures").unwrap(), ["hooks"]);
    assert_eq!(store.related("hooks").unwrap(), ["closures"]);
    assert!(store.related("ethics").unwrap().is_empty());
    assert!(store.related("nope").unwrap_err().is_not_found());
}

#[test]
fn test_empty_directory_loads_empty_store() {
    let temp = tempdir().unwrap();
    let store = DocumentStore::load(temp.path()).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.separator(), None);
    assert_eq!(store.root(), temp.path());
}

#[test]
fn test_reload_swaps_only_on_success() {
    let temp = tempdir().unwrap();
    write(temp.path(), "a.md", b"first");

    let handle = CurrentStore::load(temp.path(), &LoadOptions::default()).unwrap();
    let reader = handle.clone();
    assert_eq!(reader.snapshot().get("a").unwrap().raw_text(), "first");

    write(temp.path(), "b.md", b"second");
    handle.reload(temp.path(), &LoadOptions::default()).unwrap();
    assert_eq!(reader.snapshot().len(), 2);

    write(temp.path(), "b.txt", b"collides");
    let old = reader.snapshot();
    assert!(handle.reload(temp.path(), &LoadOptions::default()).is_err());
    assert!(std::sync::Arc::ptr_eq(&old, &reader.snapshot()));
}
