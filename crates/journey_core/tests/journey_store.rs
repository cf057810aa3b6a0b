use journey_core::{
    Document, DocumentRepository, ImageCatalog, IoAction, JourneyStore, JsonFileRepository,
    RepoError, RepoResult, Row, Section, StoreError, ValidationError,
};
use std::cell::{Cell, RefCell};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// In-memory repository whose saves can be switched to fail.
#[derive(Clone, Default)]
struct MemoryRepository {
    stored: Rc<RefCell<Document>>,
    fail_saves: Rc<Cell<bool>>,
    saves: Rc<Cell<usize>>,
}

impl DocumentRepository for MemoryRepository {
    fn load(&self) -> RepoResult<Document> {
        Ok(self.stored.borrow().clone())
    }

    fn save(&self, document: &Document) -> RepoResult<()> {
        if self.fail_saves.get() {
            return Err(RepoError::Io {
                path: PathBuf::from("memory.json"),
                action: IoAction::Write,
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.saves.set(self.saves.get() + 1);
        *self.stored.borrow_mut() = document.clone();
        Ok(())
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn memory_store() -> (JourneyStore<MemoryRepository>, MemoryRepository) {
    let repo = MemoryRepository::default();
    let store = JourneyStore::open(repo.clone(), ImageCatalog::new("missing-assets")).unwrap();
    (store, repo)
}

fn file_store(path: &Path) -> JourneyStore<JsonFileRepository> {
    JourneyStore::open(
        JsonFileRepository::new(path),
        ImageCatalog::new(path.with_file_name("assets")),
    )
    .unwrap()
}

fn sports_with_rows(store: &mut JourneyStore<MemoryRepository>, titles: &[&str]) {
    store.add_section("Sports", strings(&["Soccer"])).unwrap();
    for title in titles {
        store
            .add_row("Sports", title, "", vec![format!("{title}.png")])
            .unwrap();
    }
}

#[test]
fn end_to_end_section_and_row_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journey-data.json");
    fs::write(&path, r#"{"sections": []}"#).unwrap();
    let mut store = file_store(&path);

    store.add_section("Sports", strings(&["Soccer"])).unwrap();
    let section = store.section("Sports").unwrap();
    assert_eq!(section.tags, strings(&["Soccer"]));
    assert!(section.rows.is_empty());

    store
        .add_row("Sports", "Win", "Great day", strings(&["img1.png"]))
        .unwrap();
    assert_eq!(store.section("Sports").unwrap().rows.len(), 1);

    store
        .update_row(
            "Sports",
            0,
            "Big Win",
            "Great day",
            strings(&["img1.png", "img2.png"]),
        )
        .unwrap();
    let row = &store.section("Sports").unwrap().rows[0];
    assert_eq!(row.title, "Big Win");
    assert_eq!(row.description, "Great day");
    assert_eq!(row.photostack, strings(&["img1.png", "img2.png"]));

    let reopened = file_store(&path);
    assert_eq!(reopened.document(), store.document());

    store.delete_row("Sports", 0).unwrap();
    assert!(store.section("Sports").unwrap().rows.is_empty());
    assert!(file_store(&path).section("Sports").unwrap().rows.is_empty());
}

#[test]
fn duplicate_section_ignoring_case_is_rejected() {
    let (mut store, repo) = memory_store();
    store.add_section("Sports", Vec::new()).unwrap();
    let before = store.document().clone();

    let err = store.add_section("sPORTS", strings(&["x"])).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateSection(name) if name == "sPORTS"));
    assert_eq!(store.document(), &before);
    assert_eq!(repo.saves.get(), 1);
}

#[test]
fn empty_section_name_is_rejected() {
    let (mut store, repo) = memory_store();

    let err = store.add_section("", Vec::new()).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptySectionName)
    ));
    assert!(store.document().sections.is_empty());
    assert_eq!(repo.saves.get(), 0);
}

#[test]
fn whitespace_names_and_titles_are_kept_as_typed() {
    let (mut store, _repo) = memory_store();

    store.add_section("  ", Vec::new()).unwrap();
    store.add_row("  ", " ", "", strings(&["a.png"])).unwrap();

    let section = store.section("  ").unwrap();
    assert_eq!(section.rows[0].title, " ");
}

#[test]
fn add_row_requires_existing_section_title_and_images() {
    let (mut store, _repo) = memory_store();
    store.add_section("Sports", Vec::new()).unwrap();
    let before = store.document().clone();

    assert!(matches!(
        store.add_row("Music", "Gig", "", strings(&["a.png"])),
        Err(StoreError::SectionNotFound(name)) if name == "Music"
    ));
    assert!(matches!(
        store.add_row("Sports", "", "", strings(&["a.png"])),
        Err(StoreError::Validation(ValidationError::EmptyTitle))
    ));
    assert!(matches!(
        store.add_row("Sports", "Win", "", Vec::new()),
        Err(StoreError::Validation(ValidationError::EmptyPhotostack))
    ));
    assert_eq!(store.document(), &before);
}

#[test]
fn add_row_deduplicates_images_keeping_first_occurrence() {
    let (mut store, _repo) = memory_store();
    store.add_section("Sports", Vec::new()).unwrap();

    store
        .add_row("Sports", "Win", "", strings(&["a.png", "b.png", "a.png"]))
        .unwrap();
    assert_eq!(
        store.section("Sports").unwrap().rows[0].photostack,
        strings(&["a.png", "b.png"])
    );
}

#[test]
fn row_lookup_uses_exact_section_name() {
    let (mut store, _repo) = memory_store();
    store.add_section("Sports", Vec::new()).unwrap();

    assert!(matches!(
        store.add_row("sports", "Win", "", strings(&["a.png"])),
        Err(StoreError::SectionNotFound(_))
    ));
}

#[test]
fn update_row_validates_index_and_fields() {
    let (mut store, _repo) = memory_store();
    sports_with_rows(&mut store, &["r0"]);
    let before = store.document().clone();

    assert!(matches!(
        store.update_row("Sports", 1, "x", "", strings(&["a.png"])),
        Err(StoreError::RowNotFound { index: 1, .. })
    ));
    assert!(matches!(
        store.update_row("Sports", 0, "x", "", Vec::new()),
        Err(StoreError::Validation(ValidationError::EmptyPhotostack))
    ));
    assert!(matches!(
        store.update_row("Sports", 0, "", "", strings(&["a.png"])),
        Err(StoreError::Validation(ValidationError::EmptyTitle))
    ));
    assert!(matches!(
        store.update_row("Music", 0, "x", "", strings(&["a.png"])),
        Err(StoreError::SectionNotFound(_))
    ));
    assert_eq!(store.document(), &before);
}

#[test]
fn update_row_replaces_all_fields() {
    let (mut store, _repo) = memory_store();
    store.add_section("Sports", Vec::new()).unwrap();
    store
        .add_row("Sports", "Win", "Great day", strings(&["a.png"]))
        .unwrap();

    store
        .update_row("Sports", 0, "Loss", "", strings(&["b.png", "b.png"]))
        .unwrap();
    assert_eq!(
        store.section("Sports").unwrap().rows[0],
        Row::new("Loss", "", strings(&["b.png"]))
    );
}

#[test]
fn delete_row_shifts_later_rows_down() {
    let (mut store, _repo) = memory_store();
    sports_with_rows(&mut store, &["r0", "r1", "r2"]);

    store.delete_row("Sports", 1).unwrap();
    let titles: Vec<_> = store
        .section("Sports")
        .unwrap()
        .rows
        .iter()
        .map(|row| row.title.as_str())
        .collect();
    assert_eq!(titles, vec!["r0", "r2"]);
}

#[test]
fn delete_row_out_of_range_leaves_rows_unchanged() {
    let (mut store, _repo) = memory_store();
    sports_with_rows(&mut store, &["r0", "r1", "r2"]);
    let before = store.document().clone();

    let err = store.delete_row("Sports", 3).unwrap_err();
    assert!(matches!(
        err,
        StoreError::RowNotFound { ref section, index: 3 } if section == "Sports"
    ));
    assert_eq!(store.document(), &before);
}

#[test]
fn delete_section_removes_rows_and_blocks_later_row_adds() {
    let (mut store, repo) = memory_store();
    sports_with_rows(&mut store, &["r0", "r1"]);
    store.add_section("Music", Vec::new()).unwrap();

    store.delete_section("Sports").unwrap();
    assert_eq!(store.document().sections.len(), 1);
    assert_eq!(store.document().sections[0].name, "Music");
    assert_eq!(repo.stored.borrow().sections.len(), 1);

    assert!(matches!(
        store.add_row("Sports", "Win", "", strings(&["a.png"])),
        Err(StoreError::SectionNotFound(_))
    ));
    assert!(matches!(
        store.delete_section("Sports"),
        Err(StoreError::SectionNotFound(_))
    ));
}

#[test]
fn failed_save_rolls_back_every_mutation() {
    let (mut store, repo) = memory_store();
    sports_with_rows(&mut store, &["r0", "r1"]);
    let before = store.document().clone();
    repo.fail_saves.set(true);

    assert!(matches!(
        store.add_section("Music", Vec::new()),
        Err(StoreError::Save(_))
    ));
    assert!(matches!(
        store.add_row("Sports", "r2", "", strings(&["a.png"])),
        Err(StoreError::Save(_))
    ));
    assert!(matches!(
        store.update_row("Sports", 0, "new", "", strings(&["a.png"])),
        Err(StoreError::Save(_))
    ));
    assert!(matches!(store.delete_row("Sports", 0), Err(StoreError::Save(_))));
    assert!(matches!(store.delete_section("Sports"), Err(StoreError::Save(_))));

    assert_eq!(store.document(), &before);
    assert_eq!(&*repo.stored.borrow(), &before);

    repo.fail_saves.set(false);
    store.add_section("Music", Vec::new()).unwrap();
    assert_eq!(store.document().sections.len(), 2);
}

#[test]
fn save_document_adopts_document_only_on_success() {
    let (mut store, repo) = memory_store();
    let next = Document {
        sections: vec![Section::new("Imported", Vec::new())],
    };

    repo.fail_saves.set(true);
    assert!(matches!(
        store.save_document(next.clone()),
        Err(StoreError::Save(_))
    ));
    assert!(store.document().sections.is_empty());

    repo.fail_saves.set(false);
    store.save_document(next.clone()).unwrap();
    assert_eq!(store.document(), &next);
}

#[test]
fn load_document_picks_up_external_changes() {
    let (mut store, repo) = memory_store();
    *repo.stored.borrow_mut() = Document {
        sections: vec![Section::new("External", Vec::new())],
    };

    let loaded = store.load_document().unwrap();
    assert_eq!(loaded.sections[0].name, "External");
    assert!(store.section("External").is_some());
}

#[test]
fn open_or_empty_substitutes_empty_document_on_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journey-data.json");
    fs::write(&path, "not json").unwrap();

    assert!(matches!(
        JourneyStore::open(JsonFileRepository::new(&path), ImageCatalog::new(dir.path())),
        Err(StoreError::Load(RepoError::Malformed { .. }))
    ));

    let (store, warning) = JourneyStore::open_or_empty(
        JsonFileRepository::new(&path),
        ImageCatalog::new(dir.path()),
    );
    assert!(matches!(warning, Some(StoreError::Load(_))));
    assert!(store.document().sections.is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "not json");
}

#[test]
fn summary_reports_sections_in_order() {
    let (mut store, _repo) = memory_store();
    sports_with_rows(&mut store, &["r0", "r1"]);
    store.add_section("Music", strings(&["Jazz"])).unwrap();

    let summary = store.summary();
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].name, "Sports");
    assert_eq!(summary[0].row_count, 2);
    assert_eq!(summary[1].tags, strings(&["Jazz"]));
    assert_eq!(summary[1].row_count, 0);
}

#[test]
fn list_images_reads_configured_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let assets = dir.path().join("assets");
    fs::create_dir(&assets).unwrap();
    fs::write(assets.join("cover.webp"), b"").unwrap();
    fs::write(assets.join("notes.md"), b"").unwrap();

    let store = file_store(&dir.path().join("journey-data.json"));
    assert_eq!(store.list_images(), strings(&["cover.webp"]));
}
