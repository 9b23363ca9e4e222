use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rta_core::{
    Command, CommandError, CommandManager, Document, DomUtils, Executable, InsertHtmlExecutable,
    Node, Point, RichTextArea, Selection,
};

struct CountingExecutable {
    runs: Arc<AtomicUsize>,
}

impl Executable for CountingExecutable {
    fn is_enabled(&self, area: &RichTextArea) -> bool {
        area.document().is_some()
    }

    fn execute(&self, _area: &mut RichTextArea, _param: Option<&str>) -> Result<(), CommandError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_executed(&self, _area: &RichTextArea) -> bool {
        self.runs.load(Ordering::SeqCst) > 0
    }
}

fn area() -> RichTextArea {
    RichTextArea::new(
        Document::new(vec![Node::paragraph("text")]),
        Selection::collapsed(Point::new(vec![0, 0], 2)),
    )
}

#[test]
fn defaults_register_insertion_commands() {
    let manager = CommandManager::with_defaults(DomUtils::new()).unwrap();
    assert!(manager.is_supported(&Command::INSERT_HTML));
    assert!(manager.is_supported(&Command::CREATE_LINK));
    assert!(manager.is_supported(&Command::new("createlink")));
    assert!(!manager.is_supported(&Command::new("bold")));
}

#[test]
fn unknown_commands_are_disabled_and_fail() {
    let manager = CommandManager::with_defaults(DomUtils::new()).unwrap();
    let mut area = area();
    let bold = Command::new("bold");

    assert!(!manager.is_enabled(&area, &bold));
    assert!(!manager.is_executed(&area, &bold));
    assert!(manager.parameter(&area, &bold).is_none());

    let err = manager.execute(&mut area, &bold, None).unwrap_err();
    assert_eq!(err.message(), "Unknown command: bold");
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut manager = CommandManager::with_defaults(DomUtils::new()).unwrap();
    let err = manager
        .register(Command::INSERT_HTML, Box::new(InsertHtmlExecutable::new()))
        .unwrap_err();
    assert_eq!(err.message(), "Duplicate command: inserthtml");

    let err = manager
        .register(Command::new("createlink"), Box::new(InsertHtmlExecutable::new()))
        .unwrap_err();
    assert_eq!(err.message(), "Duplicate command: createlink");
    assert!(manager.is_supported(&Command::CREATE_LINK));
}

#[test]
fn custom_executables_are_dispatched() {
    let runs = Arc::new(AtomicUsize::new(0));
    let mut manager = CommandManager::new();
    let count = Command::new("count");
    manager
        .register(
            count.clone(),
            Box::new(CountingExecutable { runs: runs.clone() }),
        )
        .unwrap();

    let mut area = area();
    assert!(manager.is_enabled(&area, &count));
    assert!(!manager.is_executed(&area, &count));

    manager.execute(&mut area, &count, None).unwrap();
    manager.execute(&mut area, &count, Some("ignored")).unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert!(manager.is_executed(&area, &count));

    assert!(!manager.is_enabled(&RichTextArea::unloaded(), &count));
}

#[test]
fn disabled_commands_report_disabled_on_unloaded_area() {
    let manager = CommandManager::with_defaults(DomUtils::new()).unwrap();
    let area = RichTextArea::unloaded();
    assert!(!manager.is_enabled(&area, &Command::INSERT_HTML));
    assert!(!manager.is_enabled(&area, &Command::CREATE_LINK));
    assert!(manager.parameter(&area, &Command::CREATE_LINK).is_none());
}
