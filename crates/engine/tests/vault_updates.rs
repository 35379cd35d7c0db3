//! End-to-end updates against a vault on disk

#![allow(clippy::unwrap_used, clippy::panic)]

use frontdate_config::{JsonFileStore, Settings};
use frontdate_core::{FileDescriptor, Notifier, Workspace};
use frontdate_engine::frontmatter::parse_metadata;
use frontdate_engine::{CommandOutcome, DateManager, FrontMatterStore, Vault};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

#[derive(Default)]
struct Notices(RefCell<Vec<String>>);

impl Notifier for Notices {
    fn notify(&self, message: &str) {
        self.0.borrow_mut().push(message.to_string());
    }
}

struct Active(Option<FileDescriptor>);

impl Workspace for Active {
    fn active_file(&self) -> Option<FileDescriptor> {
        self.0.clone()
    }
}

fn setup(files: &[(&str, &str)]) -> (TempDir, Vault) {
    let temp = TempDir::new().unwrap();
    for (path, content) in files {
        let path = temp.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    let vault = Vault::open(temp.path()).unwrap();
    (temp, vault)
}

fn date_manager(vault: &Vault, settings: Settings) -> DateManager<FrontMatterStore, Notices> {
    DateManager::new(settings, vault.store(), Notices::default()).with_create_delay(Duration::ZERO)
}

fn read(vault: &Vault, path: &str) -> String {
    fs::read_to_string(vault.root().join(path)).unwrap()
}

fn front_matter(content: &str) -> frontdate_core::Metadata {
    let yaml = content
        .strip_prefix("---\n")
        .and_then(|rest| rest.split_once("---\n"))
        .map(|(yaml, _)| yaml)
        .unwrap();
    parse_metadata(yaml, "test").unwrap()
}

#[tokio::test]
async fn test_changed_document_gains_both_fields() {
    let (_temp, vault) = setup(&[("notes/plan.md", "# Plan\n\nSteps.\n")]);
    let manager = date_manager(&vault, Settings::default());

    let file = vault.describe(Path::new("notes/plan.md")).unwrap();
    manager.handle_file_changed(&file).await;

    let content = read(&vault, "notes/plan.md");
    assert!(content.ends_with("---\n# Plan\n\nSteps.\n"));

    let metadata = front_matter(&content);
    let keys: Vec<_> = metadata.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["created", "updated"]);
}

#[tokio::test]
async fn test_existing_front_matter_is_preserved() {
    let original = "---\ntitle: Trip   # keep me\ncreated: 2020-01-01T00:00\ntags: [a, b]\n---\nBody\n";
    let (_temp, vault) = setup(&[("trip.md", original)]);
    let manager = date_manager(&vault, Settings::default());

    let file = vault.describe(Path::new("trip.md")).unwrap();
    manager.handle_file_changed(&file).await;

    let content = read(&vault, "trip.md");
    assert!(content.starts_with(
        "---\ntitle: Trip   # keep me\ncreated: 2020-01-01T00:00\ntags: [a, b]\nupdated: "
    ));
    assert!(content.ends_with("---\nBody\n"));
    assert_eq!(front_matter(&content)["created"], "2020-01-01T00:00");
}

#[tokio::test]
async fn test_blacklisted_documents_untouched() {
    let files = [
        ("_templates/note.md", "template\n"),
        ("notes/LICENSE.md", "license\n"),
        ("scripts/run.py", "print()\n"),
    ];
    let (_temp, vault) = setup(&files);
    let manager = date_manager(&vault, Settings::default());

    for (path, content) in files {
        let file = vault.describe(Path::new(path)).unwrap();
        manager.handle_file_created(&file).await;
        assert_eq!(read(&vault, path), content);
    }
}

#[tokio::test]
async fn test_invalid_front_matter_left_alone() {
    let original = "---\ntitle: [broken\n---\nBody\n";
    let (_temp, vault) = setup(&[("bad.md", original)]);
    let manager = date_manager(&vault, Settings::default());

    let workspace = Active(Some(vault.describe(Path::new("bad.md")).unwrap()));
    let outcome = manager.update_current_file(&workspace).await;

    assert!(matches!(outcome, CommandOutcome::Failed(_)));
    assert_eq!(read(&vault, "bad.md"), original);
    assert_eq!(
        *manager.notifier().0.borrow(),
        vec!["Failed to update dates for bad.md"]
    );
}

#[tokio::test]
async fn test_second_pass_does_not_rewrite() {
    let (_temp, vault) = setup(&[("a.md", "Body\n")]);
    let manager = date_manager(&vault, Settings::default());

    let file = vault.describe(Path::new("a.md")).unwrap();
    manager.handle_file_changed(&file).await;
    let first = read(&vault, "a.md");

    // Same snapshot, same minute: nothing to write
    manager.handle_file_changed(&file).await;
    assert_eq!(read(&vault, "a.md"), first);
}

#[tokio::test]
async fn test_settings_round_trip_through_json_store() {
    let (_temp, vault) = setup(&[("drafts/idea.md", "Idea\n"), ("idea.md", "Idea\n")]);
    let config = JsonFileStore::for_vault(vault.root());
    let mut manager = date_manager(&vault, Settings::load(&config).unwrap());

    manager
        .update_settings(&config, |settings| {
            settings.set_list_from_text(frontdate_config::BlacklistList::Folders, "drafts\n");
            settings.set_created_field("born");
        })
        .unwrap();

    let mut reloaded = date_manager(&vault, Settings::default());
    reloaded.reload(&config).unwrap();
    assert_eq!(reloaded.settings(), manager.settings());

    for path in ["drafts/idea.md", "idea.md"] {
        let file = vault.describe(Path::new(path)).unwrap();
        reloaded.handle_file_changed(&file).await;
    }

    assert_eq!(read(&vault, "drafts/idea.md"), "Idea\n");
    let metadata = front_matter(&read(&vault, "idea.md"));
    assert!(metadata.contains_key("born"));
    assert!(!metadata.contains_key("created"));
}
