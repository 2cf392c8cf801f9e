//! End-to-end tests of the compiler over in-memory documents.

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::compiler::{CompileOptions, compile, compile_with};
use crate::error::{CompileError, PayTagViolation};
use crate::images::{ImageError, LocalImageBridge};
use crate::io::Document;
use crate::result::ParseResult;
use crate::tests::{StubBridge, normalize_ids};

fn compile_str(md: &str) -> Result<ParseResult, CompileError> {
    let doc = Document::from_source("post.md", md);
    compile(&doc, &mut StubBridge::default())
}

fn compile_ok(md: &str) -> ParseResult {
    compile_str(md).unwrap()
}

fn violation(md: &str) -> Option<PayTagViolation> {
    compile_str(md).unwrap_err().pay_tag_violation()
}

// Plain blocks

#[test]
fn plain_document_concatenates_blocks_in_order() {
    let result = compile_ok("# Title\n## Sub2\n### Sub3\n> quote **b**\n---\nHello *world*");
    assert_eq!(
        normalize_ids(result.combined_html()),
        concat!(
            r#"<h2 name="ID1" id="ID1">Title</h2>"#,
            r#"<h2 name="ID2" id="ID2">Sub2</h2>"#,
            r#"<h3 name="ID3" id="ID3">Sub3</h3>"#,
            r#"<blockquote name="ID4" id="ID4">quote <strong>b</strong></blockquote>"#,
            r#"<hr name="ID5" id="ID5">"#,
            r#"<p name="ID6" id="ID6">Hello <em>world</em></p>"#,
        )
    );
    assert_eq!(result.combined_html(), result.free_html());
    assert_eq!(result.pay_html(), "");
    assert!(!result.has_pay());
    assert_eq!(result.separator_id(), None);
    assert!(result.image_keys().is_empty());
}

#[test]
fn blank_lines_emit_nothing() {
    let result = compile_ok("\n  \n\t\n");
    assert_eq!(result.combined_html(), "");
}

#[test]
fn empty_document() {
    let result = compile_ok("");
    assert_eq!(result.combined_html(), "");
    assert!(!result.has_pay());
}

#[test]
fn every_block_gets_a_fresh_id() {
    let result = compile_ok("a\nb");
    let html = normalize_ids(result.free_html());
    insta::assert_snapshot!(html, @r#"<p name="ID1" id="ID1">a</p><p name="ID2" id="ID2">b</p>"#);
}

// Paywall

#[test]
fn paywall_splits_streams() {
    let result = compile_ok("intro\n\n<pay>\npaid");
    assert!(result.has_pay());
    assert_eq!(
        normalize_ids(result.combined_html()),
        concat!(
            r#"<p name="ID1" id="ID1">intro</p>"#,
            r#"<span name="ID2" id="ID2"></span>"#,
            r#"<p name="ID3" id="ID3">paid</p>"#,
        )
    );
    assert!(result.free_html().contains("intro"));
    assert!(!result.free_html().contains("paid"));
    assert!(result.pay_html().starts_with("<span"));

    let separator = result.separator_id().unwrap();
    assert!(
        result
            .free_html()
            .starts_with(&format!(r#"<p name="{separator}""#))
    );
}

#[test]
fn paywall_as_first_content_has_no_separator() {
    let result = compile_ok("\n<pay>\npaid");
    assert!(result.has_pay());
    assert_eq!(result.separator_id(), None);
    assert_eq!(result.free_html(), "");
}

#[test]
fn separator_is_list_root_when_list_precedes_paywall() {
    let result = compile_ok("- a\n  - b\n<pay>\nrest");
    let separator = result.separator_id().unwrap();
    assert!(
        result
            .free_html()
            .starts_with(&format!(r#"<ul name="{separator}""#))
    );
}

#[test]
fn separator_is_fence_when_code_precedes_paywall() {
    let result = compile_ok("```\ncode\n```\n<pay>");
    let separator = result.separator_id().unwrap();
    assert!(
        result
            .free_html()
            .starts_with(&format!(r#"<pre name="{separator}""#))
    );
}

#[test]
fn separator_is_toc_not_its_heading() {
    let result = compile_ok("<toc>\n<pay>");
    let separator = result.separator_id().unwrap();
    assert!(
        result
            .free_html()
            .contains(&format!(r#"<table-of-contents name="{separator}""#))
    );
}

#[test]
fn duplicate_paywall_is_rejected_with_line() {
    let err = compile_str("<pay>\nx\n<pay>").unwrap_err();
    assert!(matches!(
        err,
        CompileError::InvalidPayTag {
            violation: PayTagViolation::Duplicate,
            line: 3
        }
    ));
}

#[rstest]
#[case::alone("</pay>")]
#[case::in_fence("```\n</pay>\n```")]
#[case::in_list("- a\n- </pay>")]
#[case::in_pay_stream("<pay>\nfoo </PAY>")]
#[case::before_anything_else("x </pay> <pay>")]
fn closing_pay_tag_is_rejected_everywhere(#[case] md: &str) {
    assert_eq!(violation(md), Some(PayTagViolation::ClosingTag));
}

#[rstest]
#[case("text <pay>")]
#[case("<pay> text")]
#[case("<pay_line>")]
fn pay_tag_must_stand_alone(#[case] md: &str) {
    assert_eq!(violation(md), Some(PayTagViolation::NotAlone));
}

#[test]
fn pay_tag_is_case_insensitive() {
    assert!(compile_ok("a\n  <PAY>  \nb").has_pay());
}

#[test]
fn pay_tag_in_list_item_is_list_text() {
    let result = compile_ok("- <pay>");
    assert!(!result.has_pay());
    assert!(result.free_html().contains("><pay></p></li>"));
}

#[test]
fn pay_tag_in_fence_is_code() {
    let result = compile_ok("```\n<pay>\n```");
    assert!(!result.has_pay());
    assert!(result.free_html().contains("\n<pay>\n"));
}

// Fences

#[test]
fn fence_content_is_verbatim() {
    let result = compile_ok("```python\n# not heading\n  - not list\n**not bold**\n```");
    assert_eq!(
        normalize_ids(result.free_html()),
        concat!(
            r#"<pre name="ID1" id="ID1" data-lang="python"><code>"#,
            "\n# not heading\n  - not list\n**not bold**\n",
            "</code></pre>\n",
        )
    );
}

#[test]
fn unterminated_fence_is_closed_at_end() {
    let result = compile_ok("```\nx");
    assert_eq!(
        normalize_ids(result.free_html()),
        "<pre name=\"ID1\" id=\"ID1\" data-lang=\"\"><code>\nx\n</code></pre>\n"
    );
}

#[test]
fn fence_flushes_pending_list() {
    let result = compile_ok("- a\n```\ncode\n```\nafter");
    assert_eq!(
        normalize_ids(result.free_html()),
        concat!(
            r#"<ul name="ID1" id="ID1"><li><p name="ID2" id="ID2">a</p></li></ul>"#,
            r#"<pre name="ID3" id="ID3" data-lang=""><code>"#,
            "\ncode\n</code></pre>\n",
            r#"<p name="ID4" id="ID4">after</p>"#,
        )
    );
}

#[test]
fn indented_fence_delimiter_still_counts() {
    let result = compile_ok("  ```js\nx\n  ```");
    assert!(result.free_html().contains(r#"data-lang="js""#));
    assert!(result.free_html().ends_with("</code></pre>\n"));
}

// Lists

#[test]
fn blank_line_ends_list_run() {
    let result = compile_ok("- a\n\n- b");
    assert_eq!(result.free_html().matches("<ul ").count(), 2);
}

#[test]
fn paragraph_ends_list_run() {
    let result = compile_ok("1. a\n2. b\ntext");
    assert_eq!(
        normalize_ids(result.free_html()),
        concat!(
            r#"<ol data-start="1" name="ID1" id="ID1">"#,
            r#"<li><p name="ID2" id="ID2">a</p></li>"#,
            r#"<li><p name="ID3" id="ID3">b</p></li>"#,
            "</ol>",
            r#"<p name="ID4" id="ID4">text</p>"#,
        )
    );
}

#[test]
fn list_at_end_of_document_is_flushed() {
    let result = compile_ok("para\n* x");
    assert!(result.free_html().ends_with("x</p></li></ul>"));
}

// Table of contents

#[test]
fn toc_emits_heading_and_placeholder() {
    let result = compile_ok("<TOC>");
    assert_eq!(
        normalize_ids(result.free_html()),
        concat!(
            r#"<h2 name="ID1" id="ID1">目次</h2>"#,
            r#"<table-of-contents name="ID2" id="ID2"><br></table-of-contents>"#,
        )
    );
}

#[test]
fn toc_label_is_configurable() {
    let doc = Document::from_source("post.md", "<table of content>");
    let options = CompileOptions {
        toc_label: "Table of Contents".to_string(),
    };
    let result = compile_with(&doc, &mut StubBridge::default(), options).unwrap();
    assert!(result.free_html().contains(">Table of Contents</h2>"));
}

// Images

fn cat_bridge() -> StubBridge {
    StubBridge::default().with("img/cat.png", "https://cdn/cat.png", "img/abc123.png")
}

#[test]
fn image_becomes_figure_and_key() {
    let doc = Document::from_source("post.md", "![A cat](img/cat.png)");
    let result = compile(&doc, &mut cat_bridge()).unwrap();

    assert_eq!(
        normalize_ids(result.free_html()),
        concat!(
            r#"<figure name="ID1" id="ID1" class="note-image" data-image-key="img/abc123.png">"#,
            r#"<a href="https://cdn/cat.png" rel="noopener noreferrer" target="_blank">"#,
            r#"<img src="https://cdn/cat.png" alt="画像" data-src="https://cdn/cat.png"></a>"#,
            r#"<figcaption>A cat</figcaption></figure>"#,
        )
    );
    assert_eq!(result.image_keys(), ["abc123"]);
}

#[test]
fn repeated_image_is_uploaded_once() {
    let doc = Document::from_source("post.md", "![a](img/cat.png)\ntext\n![b](img/cat.png)");
    let mut bridge = cat_bridge();
    let result = compile(&doc, &mut bridge).unwrap();

    assert_eq!(bridge.calls["img/cat.png"], 1);
    assert_eq!(result.image_keys(), ["abc123", "abc123"]);
    assert_eq!(result.free_html().matches("<figure").count(), 2);
}

#[test]
fn only_first_image_on_a_line_is_uploaded() {
    let doc = Document::from_source("post.md", "![a](img/cat.png) ![b](img/dog.png)");
    let mut bridge = cat_bridge();
    let result = compile(&doc, &mut bridge).unwrap();

    assert_eq!(bridge.calls.get("img/dog.png"), None);
    assert_eq!(result.image_keys(), ["abc123"]);
    assert!(
        result
            .free_html()
            .ends_with(r#"!<a href="img/dog.png">b</a></p>"#)
    );
}

#[test]
fn image_after_paywall_goes_to_pay_stream() {
    let doc = Document::from_source("post.md", "free\n<pay>\n![a](img/cat.png)");
    let result = compile(&doc, &mut cat_bridge()).unwrap();
    assert!(result.pay_html().contains("<figure"));
    assert!(!result.free_html().contains("<figure"));
}

#[test]
fn failed_upload_aborts_with_both_paths() {
    let doc = Document::from_source("posts/p.md", "ok\n![x](missing.png)");
    let err = compile(&doc, &mut StubBridge::default()).unwrap_err();

    match err {
        CompileError::ImageUpload {
            document, image, ..
        } => {
            assert_eq!(document, std::path::PathBuf::from("posts/p.md"));
            assert_eq!(image, "missing.png");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
#[case("![x]()")]
#[case("![x](photos)")]
fn image_pointing_at_a_directory_is_not_found(#[case] md: &str) {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("photos")).unwrap();
    let doc = Document::from_source(dir.path().join("post.md"), md);

    let err = compile(&doc, &mut LocalImageBridge::with_base_dir(dir.path())).unwrap_err();

    assert!(matches!(
        err,
        CompileError::ImageUpload {
            source: ImageError::FileNotFound { .. },
            ..
        }
    ));
}

#[test]
fn text_around_an_image_becomes_one_paragraph() {
    let doc = Document::from_source("post.md", "see ![c](img/cat.png) here");
    let result = compile(&doc, &mut cat_bridge()).unwrap();
    assert!(normalize_ids(result.free_html()).ends_with(r#"<p name="ID2" id="ID2">see here</p>"#));
}

// Whole-document properties

#[test]
fn recompiling_differs_only_in_ids() {
    let md = "# T\n- a\n  1. b\n```\nc\n```\n<toc>\n<pay>\n~~d~~";
    let first = compile_ok(md);
    let second = compile_ok(md);

    assert_ne!(first.combined_html(), second.combined_html());
    assert_eq!(
        normalize_ids(first.combined_html()),
        normalize_ids(second.combined_html())
    );
}
