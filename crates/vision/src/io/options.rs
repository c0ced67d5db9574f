use serde::{Deserialize, Serialize};

/// Controls which concrete encodings `decode` preserves.
///
/// Disabling a flag routes that format through the `image` crate instead,
/// which yields RGBA or an opaque query source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Keep indexed PNGs as palette + index plane.
    pub keep_palette: bool,
    /// Keep color JPEGs as luma + chroma planes.
    pub keep_luma_chroma: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            keep_palette: true,
            keep_luma_chroma: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let opts: DecodeOptions =
            serde_json::from_str(r#"{"keep_palette": false}"#).expect("options json");
        assert!(!opts.keep_palette);
        assert!(opts.keep_luma_chroma);

        let opts: DecodeOptions = serde_json::from_str("{}").expect("empty json");
        assert_eq!(opts, DecodeOptions::default());
    }
}
