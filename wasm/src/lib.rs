use mindmap_layout::{ConfigFile, LayoutConfig, layout_spec_str};
use wasm_bindgen::prelude::*;

fn build_config(options_json: Option<&str>) -> Result<LayoutConfig, String> {
    let mut config = LayoutConfig::default();
    if let Some(raw_options) = options_json.filter(|raw| !raw.trim().is_empty()) {
        let options: ConfigFile =
            serde_json::from_str(raw_options).map_err(|error| error.to_string())?;
        options.apply(&mut config);
    }
    Ok(config)
}

fn layout_json(spec_json: &str, options_json: Option<&str>) -> Result<String, String> {
    let config = build_config(options_json)?;
    let layout = layout_spec_str(spec_json, &config);
    serde_json::to_string(&layout).map_err(|error| error.to_string())
}

/// Lays out a mind map spec and returns the layout as JSON. Bad specs still
/// produce a topic-only layout carrying an `error` note; only malformed
/// options are rejected.
#[wasm_bindgen]
pub fn layout_mind_map(spec_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    layout_json(spec_json, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use crate::{build_config, layout_json};

    #[test]
    fn lays_out_spec_with_options() {
        let spec = r#"{
            "topic": "Rust",
            "children": [
                {"label": "Ownership", "children": [{"label": "Borrowing"}, {"label": "Lifetimes"}]},
                {"label": "Tooling", "children": [{"text": "cargo"}]},
                {"label": "Async"}
            ]
        }"#;

        let json = layout_json(spec, Some(r#"{"branchGap": 150, "background": "white"}"#))
            .expect("layout should serialize");
        let layout: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(layout["algorithm"], "simple_balanced_layout");
        assert_eq!(layout["params"]["background"], "white");
        assert_eq!(layout["params"]["numBranches"], 3);
        assert!(layout["positions"]["child_1_0"].is_object());
        assert!(layout.get("error").is_none());
    }

    #[test]
    fn bad_spec_degrades_instead_of_failing() {
        let json = layout_json("not a spec", None).expect("degraded layout");
        let layout: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(layout["error"].is_string());
        assert!(layout["positions"]["topic"].is_object());
    }

    #[test]
    fn rejects_malformed_options() {
        assert!(build_config(Some("{branchGap:")).is_err());
        assert!(build_config(Some("  ")).is_ok());
    }
}
