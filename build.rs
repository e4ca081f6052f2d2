use std::fs;

const CONFIG_PATH: &str = "src/default_config.toml";
const REQUIRED_SECTIONS: &[&str] = &["content", "overlays", "style", "theme", "slide_number", "pdf"];

fn main() {
    println!("cargo:rerun-if-changed={}", CONFIG_PATH);

    let content = fs::read_to_string(CONFIG_PATH).expect("Failed to read default_config.toml");
    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {}", e),
    };

    for section in REQUIRED_SECTIONS {
        if !table.contains_key(*section) {
            panic!("default_config.toml is missing the [{}] section", section);
        }
    }

    // Theme colors are emitted into every preamble, so they must be valid hex
    let colors = table
        .get("theme")
        .and_then(|theme| theme.get("colors"))
        .and_then(|colors| colors.as_table());
    if let Some(colors) = colors {
        for (name, value) in colors {
            let hex = value.as_str().unwrap_or_default().trim_start_matches('#');
            if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                panic!("default_config.toml: theme.colors.{} is not a #rrggbb color", name);
            }
        }
    }
}
