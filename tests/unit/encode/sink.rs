use super::*;

fn card(name: &str, png: &[u8]) -> EncodedCard {
    EncodedCard {
        file_name: name.to_owned(),
        png: png.to_vec(),
    }
}

#[test]
fn dir_sink_writes_final_file_only() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("nested").join("cards");
    let sink = DirSink::new(&out);

    let saved = sink.save(&card("dune-rndm.png", b"png-bytes")).unwrap();
    assert_eq!(saved.file_name, "dune-rndm.png");
    assert_eq!(saved.bytes_written, 9);
    assert_eq!(saved.path.as_deref(), Some(out.join("dune-rndm.png").as_path()));
    assert_eq!(std::fs::read(out.join("dune-rndm.png")).unwrap(), b"png-bytes");

    let names: Vec<String> = std::fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["dune-rndm.png".to_owned()]);
}

#[test]
fn dir_sink_overwrites_existing_card() {
    let tmp = tempfile::tempdir().unwrap();
    let sink = DirSink::new(tmp.path());
    sink.save(&card("a-rndm.png", b"old")).unwrap();
    sink.save(&card("a-rndm.png", b"newer")).unwrap();
    assert_eq!(std::fs::read(tmp.path().join("a-rndm.png")).unwrap(), b"newer");
}

#[test]
fn dir_sink_rejects_path_like_names() {
    let tmp = tempfile::tempdir().unwrap();
    let sink = DirSink::new(tmp.path());
    for name in ["", "../escape.png", "sub/dir.png"] {
        let err = sink.save(&card(name, b"x")).unwrap_err();
        assert!(matches!(err, CardError::Save(_)), "{name:?}: {err}");
    }
}

#[test]
fn dir_sink_reports_unwritable_target() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();

    let err = DirSink::new(&blocker)
        .save(&card("x-rndm.png", b"x"))
        .unwrap_err();
    assert!(matches!(err, CardError::Save(_)), "{err}");
}

#[test]
fn memory_sink_keeps_cards_in_order() {
    let sink = MemorySink::new();
    sink.save(&card("one-rndm.png", b"1")).unwrap();
    let saved = sink.save(&card("two-rndm.png", b"22")).unwrap();
    assert_eq!(saved.path, None);
    assert_eq!(saved.bytes_written, 2);

    let names: Vec<String> = sink.files().into_iter().map(|c| c.file_name).collect();
    assert_eq!(names, vec!["one-rndm.png", "two-rndm.png"]);
}
