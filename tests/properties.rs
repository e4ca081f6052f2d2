use bodh::latex::extract_tables;
use bodh::latex::sanitize::sanitize;
use bodh::{Config, DirectiveResolver, Slide, detect_columns, split_slides};
use proptest::prelude::*;

proptest! {
    #[test]
    fn slide_count_matches_non_blank_blocks(blocks in prop::collection::vec("[a-z ]{0,12}", 1..8)) {
        let document = blocks.join("\n---\n");
        let expected = blocks.iter().filter(|b| !b.trim().is_empty()).count();
        match split_slides(&document, "---") {
            Ok(slides) => {
                prop_assert_eq!(slides.len(), expected);
                for (i, slide) in slides.iter().enumerate() {
                    prop_assert_eq!(slide.index, i + 1);
                }
            }
            Err(_) => prop_assert_eq!(expected, 0),
        }
    }

    #[test]
    fn sanitize_is_idempotent(text in "\\PC{0,60}", math in any::<bool>()) {
        let once = sanitize(&text, math);
        prop_assert!(once.is_ascii());
        prop_assert_eq!(sanitize(&once, math), once);
    }

    #[test]
    fn table_rows_match_header_width(
        width in 1usize..5,
        rows in prop::collection::vec(prop::collection::vec("[a-z0-9]{1,5}", 1..6), 0..8),
    ) {
        let header: Vec<String> = (0..width).map(|n| format!("H{n}")).collect();
        let mut md = format!("| {} |\n|{}\n", header.join(" | "), "---|".repeat(width));
        for row in &rows {
            md.push_str(&format!("| {} |\n", row.join(" | ")));
        }

        let out = extract_tables(md.trim_end());
        let body = out
            .split("\\midrule\n")
            .nth(1)
            .and_then(|rest| rest.split("\\bottomrule").next())
            .unwrap_or_default();
        let emitted: Vec<&str> = body.lines().collect();

        let expected = rows.iter().filter(|row| row.len() == width).count();
        prop_assert_eq!(emitted.len(), expected);
        for line in emitted {
            let cells = line.trim_end_matches(" \\\\").split(" & ").count();
            prop_assert_eq!(cells, width);
        }
    }

    #[test]
    fn column_count_equals_attributed_blocks(
        contents in prop::collection::vec("[a-z]{1,8}", 1..7),
        configured in 1usize..5,
    ) {
        let text = contents
            .iter()
            .map(|c| format!("::: {{.column}}\n{c}\n:::"))
            .collect::<Vec<_>>()
            .join("\n\n");

        let set = detect_columns(&text);
        prop_assert_eq!(set.map(|s| s.len()), Some(contents.len()));

        let mut config = Config::default();
        config.layout.columns = configured;
        let resolved = DirectiveResolver::new(&config).resolve(&Slide { index: 1, text });
        prop_assert_eq!(resolved.columns.map(|s| s.len()), Some(contents.len()));
    }
}
