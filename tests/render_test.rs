//! Integration tests for rendering analyzed documents.

use unflat::render::{self, chapter_file_name, chapter_html, from_json, navigation};
use unflat::{analyze, Document, JsonFormat, RenderOptions, SourceDocument, TextBlock, Unflat};

fn sample_source() -> SourceDocument {
    SourceDocument::from_blocks(vec![
        TextBlock::plain("1.1 Getting Started ..... 2", 1),
        TextBlock::plain("Chapter 1: Getting Going", 2),
        TextBlock::plain("Opening words.", 2),
        TextBlock::plain("1.1 Getting Started", 2),
        TextBlock::plain("Install the tool with the package man-", 2),
        TextBlock::plain("ager of your choice.", 2),
        TextBlock::plain("1.1.1 On Linux", 3),
        TextBlock::plain("Use the <distro> repository & enjoy.", 3),
        TextBlock::plain("Chapter 2: Next Steps", 4),
        TextBlock::plain("More text.", 4),
    ])
    .with_metadata("author", "Jane Roe")
    .with_metadata("language", "en")
}

fn sample() -> Document {
    analyze(&sample_source()).unwrap()
}

#[test]
fn test_markdown_default_layout() {
    let markdown = render::to_markdown(&sample(), &RenderOptions::default()).unwrap();

    assert!(markdown.contains("# Chapter 1: Getting Going\n\nOpening words.\n\n"));
    assert!(markdown.contains("Install the tool with the package manager of your choice."));
    assert!(markdown.contains("# Chapter 2: Next Steps\n\nMore text."));
    assert!(!markdown.contains("---"));
    assert!(!markdown.contains("- 1.1 Getting Started"));
}

#[test]
fn test_markdown_with_everything() {
    let markdown = Unflat::new()
        .with_render_options(
            RenderOptions::new()
                .with_frontmatter(true)
                .with_outline(true)
                .with_toc(true),
        )
        .analyze(&sample_source())
        .unwrap()
        .to_markdown()
        .unwrap();

    assert!(markdown.starts_with("---\n"));
    assert!(markdown.contains("author: \"Jane Roe\""));
    assert!(markdown.contains("language: \"en\""));
    assert!(markdown.contains("chapters: 3"));
    assert!(markdown.contains("## Contents\n\n- 1.1 Getting Started (2)\n"));
    assert!(markdown.contains("- 1.1 Getting Started\n  - 1.1.1 On Linux\n"));
}

#[test]
fn test_json_round_trip() {
    let doc = sample();
    let json = render::to_json(&doc, JsonFormat::Pretty).unwrap();
    assert!(json.contains("\"raw_content\""));

    let restored = from_json(&json).unwrap();
    assert_eq!(restored.title, doc.title);
    assert_eq!(restored.chapters, doc.chapters);
    assert_eq!(restored.toc, doc.toc);

    let compact = render::to_json(&doc, JsonFormat::Compact).unwrap();
    assert!(!compact.contains('\n'));
}

#[test]
fn test_navigation_matches_chapter_files() {
    let doc = sample();
    let nav = navigation(&doc);

    assert_eq!(nav.len(), doc.chapter_count());
    for (index, (point, chapter)) in nav.iter().zip(&doc.chapters).enumerate() {
        assert_eq!(point.href, chapter_file_name(index, chapter));
        assert_eq!(point.label, chapter.title);
    }

    let getting_going = &nav[1];
    assert_eq!(getting_going.href, "002-Chapter_1_Getting_Going.xhtml");
    assert_eq!(
        getting_going.children[0].children[0].href,
        "002-Chapter_1_Getting_Going.xhtml#h1-1"
    );
}

#[test]
fn test_chapter_html_is_escaped_and_anchored() {
    let doc = sample();
    let html = chapter_html(&doc.chapters[1]);

    assert!(html.starts_with("<?xml"));
    assert!(html.contains("<h1>Chapter 1: Getting Going</h1>"));
    assert!(html.contains("<h3 id=\"h1\">1.1 Getting Started</h3>"));
    assert!(html.contains("<h4 id=\"h1-1\">1.1.1 On Linux</h4>"));
    assert!(html.contains("<p>Use the &lt;distro&gt; repository &amp; enjoy.</p>"));
}

#[test]
fn test_chapter_files_written_to_directory() {
    let doc = sample();
    let dir = tempfile::tempdir().unwrap();

    for (index, chapter) in doc.chapters.iter().enumerate() {
        let path = dir.path().join(chapter_file_name(index, chapter));
        std::fs::write(&path, chapter_html(chapter)).unwrap();
    }

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "001-Chapter.xhtml",
            "002-Chapter_1_Getting_Going.xhtml",
            "003-Chapter_2_Next_Steps.xhtml"
        ]
    );
}
