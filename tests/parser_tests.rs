use nodus::{Document, ErrorKind, Node, ParseError, ParseOptions};

/// Parses with both storage policies, checks they agree on the tree and
/// the diagnostics, and returns the owned result.
fn parse_both(source: &str) -> (Document, Vec<ParseError>) {
    parse_both_bytes(source.as_bytes())
}

fn parse_both_bytes(source: &[u8]) -> (Document, Vec<ParseError>) {
    let mut errors = Vec::new();
    let owned = nodus::from_slice_with(source, |e| errors.push(e));

    let mut buf = source.to_vec();
    let mut view_errors = Vec::new();
    let view = nodus::from_mut_slice_with(&mut buf, |e| view_errors.push(e));

    assert_eq!(view, owned, "storage modes disagree on {source:?}");
    assert_eq!(view_errors, errors, "storage modes report differently");
    (owned, errors)
}

fn root(children: Vec<Document>) -> Document {
    Document {
        children,
        ..Document::default()
    }
}

fn leaf(id: &str) -> Document {
    Node::with_id(id)
}

fn with_data(id: &str, data: &[&str]) -> Document {
    Node::with_data(id, data.iter().copied())
}

fn err(kind: ErrorKind, byte: u8, line: usize, column: usize) -> ParseError {
    ParseError {
        kind,
        byte,
        line,
        column,
    }
}

// Special cases

#[test]
fn empty_source() {
    let (doc, errors) = parse_both("");
    assert_eq!(doc, root(vec![]));
    assert!(errors.is_empty());
}

#[test]
fn newline_only_source() {
    let (doc, errors) = parse_both("\n");
    assert_eq!(doc, root(vec![]));
    assert!(errors.is_empty());
}

#[test]
fn binary_bytes_are_skipped_with_errors() {
    let (doc, errors) = parse_both_bytes(b"\n\x00\x00");
    assert_eq!(doc, root(vec![]));
    assert_eq!(
        errors,
        vec![
            err(ErrorKind::IllegalCharacter, 0x00, 2, 1),
            err(ErrorKind::IllegalCharacter, 0x00, 2, 2),
        ]
    );
}

// Basic node parsing

#[test]
fn single_id() {
    let (doc, errors) = parse_both("Key");
    assert_eq!(doc, root(vec![leaf("Key")]));
    assert!(errors.is_empty());
}

#[test]
fn multiple_ids() {
    let (doc, errors) = parse_both("Key\nKey2");
    assert_eq!(doc, root(vec![leaf("Key"), leaf("Key2")]));
    assert!(errors.is_empty());
}

#[test]
fn ids_interleaved_with_illegal_bytes() {
    let (doc, errors) = parse_both_bytes(b"Key\n\x01\nKey2\n\x01\x02\nKey3\x03");
    assert_eq!(doc, root(vec![leaf("Key"), leaf("Key2"), leaf("Key3")]));
    assert_eq!(
        errors,
        vec![
            err(ErrorKind::IllegalCharacter, 0x01, 2, 1),
            err(ErrorKind::IllegalCharacter, 0x01, 4, 1),
            err(ErrorKind::IllegalCharacter, 0x02, 4, 2),
            err(ErrorKind::IllegalCharacter, 0x03, 5, 5),
        ]
    );
}

#[test]
fn ids_between_comments() {
    let (doc, errors) = parse_both("\nKey\n/* Comment */\nKey2\n// Comment2\nKey3\n");
    assert_eq!(doc, root(vec![leaf("Key"), leaf("Key2"), leaf("Key3")]));
    assert!(errors.is_empty());
}

#[test]
fn ids_with_special_characters() {
    let (doc, errors) = parse_both("\nキー\n(Parenthesis)\n'Odd'\n");
    assert_eq!(
        doc,
        root(vec![leaf("キー"), leaf("(Parenthesis)"), leaf("'Odd'")])
    );
    assert!(errors.is_empty());
}

#[test]
fn string_ids() {
    let (doc, errors) = parse_both(
        "\n\"string id without data\"\n\"string id with data\" \"data\"\n\"escaped\\ncharacter\"\n",
    );
    assert_eq!(
        doc,
        root(vec![
            leaf("string id without data"),
            with_data("string id with data", &["data"]),
            leaf("escaped\ncharacter"),
        ])
    );
    assert!(errors.is_empty());
}

#[test]
fn block_is_not_a_valid_id() {
    let (doc, errors) = parse_both("\n{\n\tblock\n} data\n");
    assert_eq!(doc, root(vec![leaf("block"), leaf("data")]));
    assert_eq!(
        errors,
        vec![
            err(ErrorKind::IllegalCharacter, b'{', 2, 1),
            err(ErrorKind::IllegalCharacter, b'}', 4, 1),
        ]
    );
}

// Data lists

#[test]
fn identifier_data_split_on_whitespace() {
    let (doc, errors) = parse_both("Key data1 data2 data3 da\tta4\tdata5");
    assert_eq!(
        doc,
        root(vec![with_data(
            "Key",
            &["data1", "data2", "data3", "da", "ta4", "data5"]
        )])
    );
    assert!(errors.is_empty());
}

#[test]
fn string_data_with_escapes() {
    let (doc, errors) =
        parse_both("Key data1 \"data2\" \"\\\"data3\\\"\" \"da\\\"ta4\" \"da\\nta5\"");
    assert_eq!(
        doc,
        root(vec![with_data(
            "Key",
            &["data1", "data2", "\"data3\"", "da\"ta4", "da\nta5"]
        )])
    );
    assert!(errors.is_empty());
}

#[test]
fn unterminated_strings_end_at_the_line() {
    let (doc, errors) = parse_both("Key \"da\nta\"");
    assert_eq!(
        doc,
        root(vec![with_data("Key", &["da"]), with_data("ta", &[""])])
    );
    assert_eq!(
        errors,
        vec![
            err(ErrorKind::StringNotClosed, 0, 1, 5),
            err(ErrorKind::StringNotClosed, 0, 2, 3),
        ]
    );
}

#[test]
fn line_continuation_joins_data_lists() {
    let (doc, errors) = parse_both("Key a \\\n    b\nKey2");
    assert_eq!(
        doc,
        root(vec![with_data("Key", &["a", "b"]), leaf("Key2")])
    );
    assert!(errors.is_empty());
}

#[test]
fn line_continuation_rejects_trailing_content() {
    // The junk is discarded with a warning; the data context still
    // continues on the next line.
    let (doc, errors) = parse_both("Key \\ junk\nKey2");
    assert_eq!(doc, root(vec![with_data("Key", &["Key2"])]));
    assert_eq!(errors, vec![err(ErrorKind::RequireNewline, b'j', 1, 7)]);
}

// Blocks

#[test]
fn empty_block() {
    let (doc, errors) = parse_both("Key {\n}");
    assert_eq!(doc, root(vec![with_data("Key", &[""])]));
    assert!(errors.is_empty());
}

#[test]
fn block_indentation_variants() {
    let source = "\nKey data1 {\n\tdata2\n}\nKey2 {\n    data3\n}\n\tKey3 {\n        Space indentation\n        Second line\n\t}\n\nKey4 {\n    \\ with space before\n}\nKey5 {\n\t\n}\nKey6 {\n    \n}\n";
    let (doc, errors) = parse_both(source);
    assert_eq!(
        doc,
        root(vec![
            with_data("Key", &["data1", "data2"]),
            with_data("Key2", &["data3"]),
            with_data("Key3", &["Space indentation\nSecond line"]),
            with_data("Key4", &[" with space before"]),
            with_data("Key5", &[""]),
            with_data("Key6", &[""]),
        ])
    );
    assert!(errors.is_empty());
}

#[test]
fn block_unclosed_at_eof() {
    let (doc, errors) = parse_both("Key {");
    assert_eq!(doc, root(vec![with_data("Key", &[""])]));
    assert_eq!(errors, vec![err(ErrorKind::BlockNotClosed, 0, 1, 5)]);
}

#[test]
fn block_unclosed_after_indentation() {
    let (doc, errors) = parse_both("Key {\n    ");
    assert_eq!(doc, root(vec![with_data("Key", &[""])]));
    assert_eq!(errors, vec![err(ErrorKind::BlockNotClosed, 0, 1, 5)]);
}

#[test]
fn block_unclosed_with_content() {
    let (doc, errors) = parse_both("Key {\n    data");
    assert_eq!(doc, root(vec![with_data("Key", &["data"])]));
    assert_eq!(errors, vec![err(ErrorKind::BlockNotClosed, 0, 1, 5)]);
}

#[test]
fn block_trailing_escape_at_eof() {
    let (doc, errors) = parse_both("Key {\n    data\\");
    assert_eq!(doc, root(vec![with_data("Key", &["data"])]));
    assert_eq!(
        errors,
        vec![
            err(ErrorKind::InvalidEscape, 0, 2, 10),
            err(ErrorKind::BlockNotClosed, 0, 1, 5),
        ]
    );
}

#[test]
fn block_close_at_content_indentation_is_text() {
    let (doc, errors) = parse_both("Key {\n\tempty\n\t}\n}");
    assert_eq!(doc, root(vec![with_data("Key", &["empty\n}"])]));
    assert_eq!(errors, vec![err(ErrorKind::BadBlockClose, 0, 3, 2)]);
}

#[test]
fn block_of_one_newline() {
    let (doc, errors) = parse_both("\nKey {\n\t\n\t\n}\n");
    assert_eq!(doc, root(vec![with_data("Key", &["\n"])]));
    assert!(errors.is_empty());
}

#[test]
fn block_close_on_first_line_ignores_indentation() {
    let (doc, errors) = parse_both("Key {\n\t}");
    assert_eq!(doc, root(vec![with_data("Key", &[""])]));
    assert!(errors.is_empty());
}

// Block codecs

#[test]
fn empty_base64_block() {
    let (doc, errors) = parse_both("Key {base64\n}");
    assert_eq!(doc, root(vec![with_data("Key", &[""])]));
    assert!(errors.is_empty());
}

#[test]
fn base64_codec_with_space() {
    let (doc, errors) = parse_both("Key { base64\n}");
    assert_eq!(doc, root(vec![with_data("Key", &[""])]));
    assert!(errors.is_empty());
}

#[test]
fn base64_block_decodes() {
    let (doc, errors) = parse_both("\nKey { base64\n\taGVsbG8=\n}\n\n");
    assert_eq!(doc, root(vec![with_data("Key", &["hello"])]));
    assert!(errors.is_empty());
}

#[test]
fn base64_block_without_padding() {
    let (doc, errors) = parse_both("\nKey { base64\n\taGVsbG8\n}\n\n");
    assert_eq!(doc, root(vec![with_data("Key", &["hello"])]));
    assert!(errors.is_empty());
}

#[test]
fn base64_stray_bytes_decode_as_zero() {
    let (doc, errors) = parse_both("\nKey { base64\n\t\\ \t& \n\taGVsbG8=\n}\n\n");
    let expected = Document {
        id: Vec::new(),
        data: Vec::new(),
        children: vec![Node::with_data("Key", [b"\x00\x00\x00hello".to_vec()])],
    };
    assert_eq!(doc, expected);
    assert!(errors.is_empty());
}

#[test]
fn base64_short_groups() {
    let source = "\nKey { base64\n\ta\n}\nKey { base64\n\taG\n}\nKey { base64\n\taGV\n}\nKey { base64\n\taGVs\n}\n";
    let (doc, errors) = parse_both(source);
    assert_eq!(
        doc,
        root(vec![
            with_data("Key", &[""]),
            with_data("Key", &["h"]),
            with_data("Key", &["he"]),
            with_data("Key", &["hel"]),
        ])
    );
    assert!(errors.is_empty());
}

#[test]
fn base64_spans_lines() {
    let (doc, errors) = parse_both("\nKey { base64\n\taGVs\n\tbG8=\n}\n");
    assert_eq!(doc, root(vec![with_data("Key", &["hello"])]));
    assert!(errors.is_empty());
}

#[test]
fn unknown_codec_falls_back_to_text() {
    let (doc, errors) = parse_both("Key {badcodec\n}");
    assert_eq!(doc, root(vec![with_data("Key", &[""])]));
    assert_eq!(errors, vec![err(ErrorKind::BadCodec, 0, 1, 6)]);
}

#[test]
fn codec_line_must_end_after_the_codec() {
    let (doc, errors) = parse_both("Key {base64 error\n}");
    assert_eq!(doc, root(vec![with_data("Key", &[""])]));
    assert_eq!(errors, vec![err(ErrorKind::RequireNewline, b'e', 1, 13)]);
}

// Nested nodes

#[test]
fn simple_nested_node() {
    let (doc, errors) = parse_both("\n#HASH\n#\n");
    assert_eq!(doc, root(vec![leaf("HASH")]));
    assert!(errors.is_empty());
}

#[test]
fn deeply_nested_nodes() {
    let source = "\n#HASH\n\t#NESTED\n\t\t#THIRD\n\t\t#\n\t\t\n\t\tAnotherKey\n\t#\n#\n";
    let (doc, errors) = parse_both(source);

    let mut nested = leaf("NESTED");
    nested.children = vec![leaf("THIRD"), leaf("AnotherKey")];
    let mut hash = leaf("HASH");
    hash.children = vec![nested];

    assert_eq!(doc, root(vec![hash]));
    assert!(errors.is_empty());
}

#[test]
fn hash_chain_closes_level_by_level() {
    let (doc, errors) = parse_both("#HASH\n\t#NESTED\n\t\t#THIRD\n\t\t#\n\t#\n#\n");
    assert_eq!(doc.children.len(), 1);
    let hash = &doc.children[0];
    assert_eq!(hash.id, b"HASH");
    let nested = &hash.children[0];
    assert_eq!(nested.id, b"NESTED");
    assert_eq!(nested.children[0].id, b"THIRD");
    assert!(errors.is_empty());
}

#[test]
fn unclosed_nested_node() {
    let (doc, errors) = parse_both("\n#HASH\n");
    assert_eq!(doc, root(vec![leaf("HASH")]));
    assert_eq!(errors, vec![err(ErrorKind::NodeNotClosed, 0, 2, 1)]);
}

#[test]
fn stray_closing_marker() {
    let (doc, errors) = parse_both("#");
    assert_eq!(doc, root(vec![]));
    assert_eq!(
        errors,
        vec![err(ErrorKind::TooManyNodeClosingMarkers, 0, 1, 1)]
    );
}

#[test]
fn double_hash_reports_but_recovers() {
    let (doc, errors) = parse_both("##test\nnested\n#");
    let mut test = leaf("test");
    test.children = vec![leaf("nested")];
    assert_eq!(doc, root(vec![test]));
    assert_eq!(errors, vec![err(ErrorKind::IllegalCharacter, b'#', 1, 2)]);
}

// Semicolons

#[test]
fn semicolon_separates_nodes_on_a_line() {
    let (doc, errors) = parse_both("\nKey1 ; Key2\nKey3; Key4\nKey5 value1 \"value2\"\n");
    assert_eq!(
        doc,
        root(vec![
            leaf("Key1"),
            leaf("Key2"),
            leaf("Key3"),
            leaf("Key4"),
            with_data("Key5", &["value1", "value2"]),
        ])
    );
    assert!(errors.is_empty());
}

#[test]
fn semicolon_inside_nested_headers() {
    let (doc, errors) = parse_both("\n#Key1; Key2\n#\n\n#Key3; Key4; #\n\n#Key5 ; Key6 ; #\n");
    let expected: Vec<Document> = [("Key1", "Key2"), ("Key3", "Key4"), ("Key5", "Key6")]
        .iter()
        .map(|(outer, inner)| {
            let mut node = leaf(outer);
            node.children = vec![leaf(inner)];
            node
        })
        .collect();
    assert_eq!(doc, root(expected));
    assert!(errors.is_empty());
}

// Comments

#[test]
fn unclosed_multiline_comment() {
    let (doc, errors) = parse_both("\n/*\n * \n * \n *\n");
    assert_eq!(doc, root(vec![]));
    assert_eq!(errors, vec![err(ErrorKind::CommentNotClosed, 0, 2, 1)]);
}

#[test]
fn nodes_after_multiline_comments() {
    let (doc, errors) = parse_both("\n/*\n * \n */Key\n\n/*\n *\n */ Key2\n");
    assert_eq!(doc, root(vec![leaf("Key"), leaf("Key2")]));
    assert!(errors.is_empty());
}

#[test]
fn node_after_line_comment() {
    let (doc, errors) = parse_both("\n//\nKey\n");
    assert_eq!(doc, root(vec![leaf("Key")]));
    assert!(errors.is_empty());
}

#[test]
fn slash_star_slash_is_unclosed() {
    let (doc, errors) = parse_both("/*/");
    assert_eq!(doc, root(vec![]));
    assert_eq!(errors, vec![err(ErrorKind::CommentNotClosed, 0, 1, 1)]);
}

#[test]
fn comment_between_data() {
    let (doc, errors) = parse_both("Node /*/path/to/file*/data");
    assert_eq!(doc, root(vec![with_data("Node", &["data"])]));
    assert!(errors.is_empty());
}

#[test]
fn lone_slash_is_an_identifier() {
    let (doc, errors) = parse_both("Node /path/to/file");
    assert_eq!(doc, root(vec![with_data("Node", &["/path/to/file"])]));
    assert!(errors.is_empty());
}

// Newline handling

#[test]
fn crlf_counts_as_one_newline() {
    let (doc, errors) = parse_both_bytes(b"\r\n\x00");
    assert_eq!(doc, root(vec![]));
    assert_eq!(errors, vec![err(ErrorKind::IllegalCharacter, 0x00, 2, 1)]);
}

#[test]
fn crlf_in_blocks_normalises_to_lf() {
    let (doc, errors) = parse_both("Key {\r\n\tdata\r\n\tmore data\r\n}\r\n");
    assert_eq!(doc, root(vec![with_data("Key", &["data\nmore data"])]));
    assert!(errors.is_empty());
}

// Unicode passes through as opaque bytes

#[test]
fn unicode_ids_data_and_blocks() {
    let source = "\n🍵 tea\ntea 🍵\ncoffee \"☕\"\n\"☕\" coffee\nmultiple_codes 🍵☕\nblock {\n\t🍵☕\n}\n\n";
    let (doc, errors) = parse_both(source);
    assert_eq!(
        doc,
        root(vec![
            with_data("🍵", &["tea"]),
            with_data("tea", &["🍵"]),
            with_data("coffee", &["☕"]),
            with_data("☕", &["coffee"]),
            with_data("multiple_codes", &["🍵☕"]),
            with_data("block", &["🍵☕"]),
        ])
    );
    assert!(errors.is_empty());
}

#[test]
fn unicode_id_at_eof() {
    let (doc, errors) = parse_both("🍵");
    assert_eq!(doc, root(vec![leaf("🍵")]));
    assert!(errors.is_empty());
}

// Limits

#[test]
fn recursion_limit_bounds_tree_depth() {
    let mut source = String::new();
    for _ in 0..2000 {
        source.push_str("#Nested\n");
    }
    for _ in 0..2000 {
        source.push_str("#\n");
    }

    let (doc, errors) = parse_both(&source);

    let mut current = &doc;
    for depth in 0..2000 {
        assert!(
            !current.children.is_empty(),
            "chain truncated at depth {depth}"
        );
        current = &current.children[0];
    }
    assert!(current.children.is_empty());

    assert_eq!(
        errors,
        vec![
            err(ErrorKind::RecursionLimitReached, 0, 2000, 1),
            err(ErrorKind::TooManyNodeClosingMarkers, 0, 4000, 1),
        ]
    );
}

#[test]
fn recursion_limit_is_configurable() {
    let options = ParseOptions::new().with_recursion_limit(3);
    let mut errors = Vec::new();
    let doc =
        nodus::from_slice_with_options("#A\n\t#B\n\t\tC\n\t#\n#\n", &options, |e| errors.push(e));

    // C sits at the limit: appended, but its body would be one too deep.
    let b = &doc.children[0].children[0];
    assert_eq!(b.id, b"B");
    assert_eq!(b.children.len(), 1);
    assert!(b.children[0].children.is_empty());
    assert_eq!(errors, vec![err(ErrorKind::RecursionLimitReached, 0, 3, 3)]);
}

#[test]
fn error_budget_drops_further_reports() {
    let source: String = std::iter::repeat("\x01").take(25).collect();
    let (_, errors) = parse_both(&source);
    assert_eq!(errors.len(), 10);
}
