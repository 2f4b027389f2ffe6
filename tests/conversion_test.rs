//! End-to-end conversions through the genpdf canvas.
//!
//! These tests render real documents, so they need TrueType fonts reachable
//! through the default registry search (./fonts or the system font dirs).

use std::cell::RefCell;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use pdfpipe::config::{Orientation, PaperSize};
use pdfpipe::fonts::FontRegistry;
use pdfpipe::open::Opener;
use pdfpipe::{Config, Converter, PdfPipeError, Result, RunReport};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct RecordingOpener {
    opened: Rc<RefCell<Vec<PathBuf>>>,
}

impl Opener for RecordingOpener {
    fn open(&self, path: &Path) -> Result<()> {
        self.opened.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

struct Outcome {
    result: Result<RunReport>,
    stdout: String,
    stderr: String,
    opened: Vec<PathBuf>,
}

fn convert(config: &Config, stdin: &str) -> Outcome {
    let opener = RecordingOpener::default();
    let mut converter = Converter::new(FontRegistry::new(&[]), Box::new(opener.clone()));

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let result = converter.run(config, Cursor::new(stdin.to_string()), &mut stdout, &mut stderr);

    let opened = opener.opened.borrow().clone();
    Outcome {
        result,
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
        opened,
    }
}

fn page_count(path: &Path) -> usize {
    let doc = lopdf::Document::load(path).expect("output should be a valid PDF");
    doc.get_pages().len()
}

/// Glyph codes shown by the text operators of each page, in page order
fn glyphs_per_page(path: &Path) -> Vec<Vec<Vec<u8>>> {
    let doc = lopdf::Document::load(path).expect("output should be a valid PDF");
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = doc
                .get_and_decode_page_content(page_id)
                .expect("page content should decode");
            content
                .operations
                .iter()
                .filter(|op| op.operator == "TJ" || op.operator == "Tj")
                .flat_map(|op| op.operands.iter())
                .flat_map(|operand| match operand {
                    lopdf::Object::Array(items) => items.clone(),
                    other => vec![other.clone()],
                })
                .filter_map(|item| match item {
                    lopdf::Object::String(bytes, _) => Some(bytes),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

fn render_stdin(dir: &TempDir, name: &str, config: Config, text: &str) -> Vec<Vec<Vec<u8>>> {
    let config = Config {
        output: dir.path().join(name),
        ..config
    };
    convert(&config, text)
        .result
        .expect("conversion should succeed");
    glyphs_per_page(&config.output)
}

fn number(object: &lopdf::Object) -> f64 {
    match object {
        lopdf::Object::Integer(value) => *value as f64,
        lopdf::Object::Real(value) => *value as f64,
        other => panic!("expected a number, got {:?}", other),
    }
}

fn write_input(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_stdin_with_default_flags_makes_one_page() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        output: dir.path().join("output.pdf"),
        ..Default::default()
    };

    let outcome = convert(&config, "hello\nworld\n");
    let report = outcome.result.expect("conversion should succeed");

    assert_eq!(report.units_rendered, 1);
    assert_eq!(report.files_skipped, 0);
    assert!(!report.opened);
    assert!(fs::read(&config.output).unwrap().starts_with(b"%PDF"));
    assert_eq!(page_count(&config.output), 1);
    assert_eq!(
        outcome.stdout,
        format!("PDF created: {}\n", config.output.display())
    );
    assert!(outcome.stderr.is_empty());
}

#[test]
fn test_empty_stdin_still_writes_a_page() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        output: dir.path().join("empty.pdf"),
        ..Default::default()
    };

    let report = convert(&config, "").result.expect("conversion should succeed");

    assert_eq!(report.units_rendered, 1);
    assert_eq!(page_count(&config.output), 1);
}

#[test]
fn test_page_breaks_put_each_file_on_its_own_page() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        output: dir.path().join("breaks.pdf"),
        page_breaks: true,
        input_files: vec![
            write_input(&dir, "a.txt", "A"),
            write_input(&dir, "b.txt", "B"),
        ],
        ..Default::default()
    };

    let report = convert(&config, "").result.expect("conversion should succeed");

    assert_eq!(report.units_rendered, 2);
    assert_eq!(page_count(&config.output), 2);

    let letter_a = render_stdin(&dir, "a.pdf", Config::default(), "A");
    let letter_b = render_stdin(&dir, "b.pdf", Config::default(), "B");
    assert_ne!(letter_a, letter_b);
    assert_eq!(
        glyphs_per_page(&config.output),
        vec![letter_a[0].clone(), letter_b[0].clone()]
    );
}

#[test]
fn test_without_page_breaks_short_files_share_a_page() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        output: dir.path().join("spaced.pdf"),
        input_files: vec![
            write_input(&dir, "a.txt", "A"),
            write_input(&dir, "b.txt", "B"),
            write_input(&dir, "c.txt", "C"),
        ],
        ..Default::default()
    };

    convert(&config, "").result.expect("conversion should succeed");

    assert_eq!(page_count(&config.output), 1);
}

#[test]
fn test_unreadable_file_is_skipped_not_substituted() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.txt");
    let config = Config {
        output: dir.path().join("partial.pdf"),
        page_breaks: true,
        input_files: vec![write_input(&dir, "a.txt", "A"), missing.clone()],
        ..Default::default()
    };

    let outcome = convert(&config, "");
    let report = outcome.result.expect("conversion should succeed");

    assert_eq!(report.units_rendered, 1);
    assert_eq!(report.files_skipped, 1);
    assert_eq!(page_count(&config.output), 1);
    assert!(outcome.stderr.contains("Error reading file"));
    assert!(outcome.stderr.contains(&missing.display().to_string()));
    assert_eq!(outcome.stderr.lines().count(), 1);
}

#[test]
fn test_long_input_flows_onto_more_pages() {
    let dir = TempDir::new().unwrap();
    let text: String = (1..=200).map(|i| format!("line number {}\n", i)).collect();
    let config = Config {
        output: dir.path().join("long.pdf"),
        ..Default::default()
    };

    convert(&config, &text).result.expect("conversion should succeed");

    assert!(page_count(&config.output) > 1);
}

#[test]
fn test_unbroken_long_line_is_wrapped_not_dropped() {
    let dir = TempDir::new().unwrap();
    let line = "x".repeat(300);

    let pages = render_stdin(&dir, "long-word.pdf", Config::default(), &format!("{}\n", line));
    let drawn: usize = pages.iter().map(|page| page.len()).sum();

    assert_eq!(drawn, 300);
}

#[test]
fn test_long_word_between_short_words_keeps_neighbours() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        font_family: "Helvetica".to_string(),
        ..Default::default()
    };
    let text = format!("start {} end\n", "w".repeat(200));

    let pages = render_stdin(&dir, "mixed.pdf", config.clone(), &text);
    let start = render_stdin(&dir, "start.pdf", config.clone(), "start");
    let end = render_stdin(&dir, "end.pdf", config, "end");
    let drawn: Vec<Vec<u8>> = pages.concat();

    assert!(drawn.starts_with(&start[0]));
    assert!(drawn.ends_with(&end[0]));
    assert!(drawn.len() >= "start".len() + 200 + "end".len());
}

#[test]
fn test_title_drawn_before_first_unit() {
    let dir = TempDir::new().unwrap();
    let untitled = render_stdin(&dir, "untitled.pdf", Config::default(), "body\n");
    let titled = render_stdin(
        &dir,
        "titled.pdf",
        Config {
            title: "Notes".to_string(),
            ..Default::default()
        },
        "body\n",
    );

    assert_eq!(untitled[0].len(), "body".len());
    assert_eq!(titled[0].len(), "Notes".len() + "body".len());
    assert!(titled[0].ends_with(&untitled[0]));
}

#[test]
fn test_footer_page_index_only_with_page_numbers() {
    let dir = TempDir::new().unwrap();
    let plain = render_stdin(&dir, "plain.pdf", Config::default(), "hi\n");
    let numbered = render_stdin(
        &dir,
        "numbered.pdf",
        Config {
            page_numbers: true,
            ..Default::default()
        },
        "hi\n",
    );

    assert_eq!(plain[0].len(), "hi".len());
    assert_eq!(numbered[0].len(), "hi".len() + "Page 1".len());
}

#[test]
fn test_title_page_numbers_and_proportional_font() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        output: dir.path().join("styled.pdf"),
        title: "Quarterly Notes".to_string(),
        page_numbers: true,
        page_breaks: true,
        font_family: "Helvetica".to_string(),
        input_files: vec![
            write_input(&dir, "one.txt", "first\tindented\n\nafter blank"),
            write_input(&dir, "two.txt", "second – with “quotes” and λ"),
        ],
        ..Default::default()
    };

    let report = convert(&config, "").result.expect("conversion should succeed");

    assert_eq!(report.units_rendered, 2);
    let pages = glyphs_per_page(&config.output);
    assert_eq!(pages.len(), 2);
    // the footer is drawn before the body: "Page 1" and "Page 2" differ in the sixth glyph
    assert_eq!(pages[0][..5], pages[1][..5]);
    assert_ne!(pages[0][5], pages[1][5]);
}

#[test]
fn test_landscape_legal_page_is_wider_than_tall() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        output: dir.path().join("wide.pdf"),
        paper: PaperSize::Legal,
        orientation: Orientation::Landscape,
        ..Default::default()
    };

    convert(&config, "wide\n").result.expect("conversion should succeed");

    let doc = lopdf::Document::load(&config.output).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    let media_box = doc
        .get_object(page_id)
        .and_then(|page| page.as_dict())
        .and_then(|page| page.get(b"MediaBox"))
        .and_then(|media_box| media_box.as_array())
        .expect("page should have a MediaBox")
        .clone();
    let width = number(&media_box[2]) - number(&media_box[0]);
    let height = number(&media_box[3]) - number(&media_box[1]);

    assert!(width > height);
}

#[test]
fn test_open_flag_hands_output_to_opener() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        output: dir.path().join("open.pdf"),
        open_after_write: true,
        ..Default::default()
    };

    let outcome = convert(&config, "open me\n");
    let report = outcome.result.expect("conversion should succeed");

    assert!(report.opened);
    assert_eq!(outcome.opened, vec![config.output.clone()]);
    assert!(outcome
        .stdout
        .contains(&format!("Opening PDF file: {}", config.output.display())));
}

#[test]
fn test_unwritable_output_reports_and_skips_open() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        output: dir.path().join("no-such-dir").join("out.pdf"),
        open_after_write: true,
        ..Default::default()
    };

    let outcome = convert(&config, "text\n");

    match outcome.result {
        Err(PdfPipeError::Write { path, .. }) => assert_eq!(path, config.output),
        Err(other) => panic!("expected a write error, got {}", other),
        Ok(_) => panic!("expected a write error"),
    }
    assert!(outcome.opened.is_empty());
    assert!(outcome.stdout.is_empty());
}

#[test]
fn test_unsupported_font_creates_no_output() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        output: dir.path().join("never.pdf"),
        font_family: "unsupported-name".to_string(),
        ..Default::default()
    };

    let outcome = convert(&config, "text\n");

    let err = outcome.result.err().expect("font should be rejected");
    assert!(err.to_string().contains("unsupported-name"));
    assert!(!config.output.exists());
}
