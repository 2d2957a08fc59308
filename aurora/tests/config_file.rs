use aurora::document::{Block, DocumentModel, RichTextDocument};
use aurora::editor_config::{ConfigError, EditorConfig, CONFIG_FILE_NAME};
use aurora::Editor;

#[test]
fn test_config_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    let config = EditorConfig {
        namespace: "Manuscript".to_string(),
        placeholder: "Once upon a time...".to_string(),
        locale: "fr".to_string(),
        initial_content: None,
    };
    config.save(&path).unwrap();

    let loaded = EditorConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_initial_content_relative_to_config() {
    let dir = tempfile::tempdir().unwrap();

    let draft = RichTextDocument::from_blocks(vec![Block::paragraph("Saved draft text")]);
    let json = draft.snapshot().to_json_pretty().unwrap();
    std::fs::write(dir.path().join("draft.json"), json).unwrap();

    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "initial_content = \"draft.json\"\n").unwrap();

    let config = EditorConfig::load(&path).unwrap();
    assert_eq!(config.initial_content, Some(dir.path().join("draft.json")));

    let editor = Editor::builder(config).build().unwrap();
    assert_eq!(editor.state().text_content(), "Saved draft text");
    assert_eq!(editor.metrics().word_count, 3);
    assert_eq!(editor.placeholder(), None);
}

#[test]
fn test_missing_and_malformed_files() {
    let dir = tempfile::tempdir().unwrap();

    let missing = EditorConfig::load(dir.path().join("absent.toml"));
    assert!(matches!(missing, Err(ConfigError::IoError(_))));

    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "namespace = [").unwrap();
    assert!(matches!(EditorConfig::load(&path), Err(ConfigError::ParseError(_))));

    std::fs::write(dir.path().join("bad.json"), "{\"root\": 1}").unwrap();
    let config = EditorConfig {
        initial_content: Some(dir.path().join("bad.json")),
        ..EditorConfig::default()
    };
    assert!(matches!(config.initial_snapshot(), Err(ConfigError::Snapshot { .. })));
}
