//! Hands protected script and style bodies to the configured minifiers and
//! re-protects what comes back.

use hc_core::{EmbeddedKind, FragmentKind, Minifier, MinifyWarning};

use crate::patterns::CDATA;
use crate::vault::PlaceholderVault;

/// Minifiers to run; `None` leaves that language untouched.
#[derive(Clone, Copy, Default)]
pub struct EmbeddedMinifiers<'a> {
    pub javascript: Option<&'a dyn Minifier>,
    pub css: Option<&'a dyn Minifier>,
}

/// Minify every script/style fragment. A failing block keeps its original
/// text and yields a warning; the rest of the document is unaffected.
pub fn compress_embedded(vault: &mut PlaceholderVault, minifiers: EmbeddedMinifiers<'_>) -> Vec<MinifyWarning> {
    let mut warnings = Vec::new();
    let mut ordinals = (0usize, 0usize);

    for index in 0..vault.len() {
        let fragment = &vault.fragments()[index];
        // Released blocks were deleted with a comment; nothing of them reaches the output.
        if !fragment.kind.is_minifiable() || fragment.is_released() {
            continue;
        }
        let body = fragment.original.clone();
        let (minifier, block, ordinal, closing, minified_kind) = if fragment.kind == FragmentKind::ScriptBlock {
            ordinals.0 += 1;
            (minifiers.javascript, EmbeddedKind::JavaScript, ordinals.0 - 1, "</script", FragmentKind::MinifiedJs)
        } else {
            ordinals.1 += 1;
            (minifiers.css, EmbeddedKind::Css, ordinals.1 - 1, "</style", FragmentKind::MinifiedCss)
        };
        let Some(minifier) = minifier else { continue };

        match minify_block(minifier, &body, closing, vault) {
            Ok(minified) => vault.replace(index, minified, minified_kind),
            Err(message) => {
                tracing::warn!(
                    minifier = minifier.name(),
                    block = ordinal,
                    error = %message,
                    "minifier failed, keeping block as written"
                );
                warnings.push(MinifyWarning { block, index: ordinal, minifier: minifier.name().to_string(), message });
            }
        }
    }
    warnings
}

fn minify_block(minifier: &dyn Minifier, body: &str, closing: &str, vault: &PlaceholderVault) -> Result<String, String> {
    let (source, cdata) = match CDATA.captures(body).and_then(|c| c.get(1)) {
        Some(inner) => (inner.as_str(), true),
        None => (body, false),
    };

    let minified = minifier.minify(source).map_err(|e| format!("{e:#}"))?;

    if minified.to_ascii_lowercase().contains(closing) {
        return Err(format!("output contains `{closing}`"));
    }
    let mut before = vault.indices_in(source);
    let mut after = vault.indices_in(&minified);
    before.sort_unstable();
    after.sort_unstable();
    if before != after {
        return Err("output altered embedded placeholders".to_string());
    }

    Ok(if cdata { format!("<![CDATA[{minified}]]>") } else { minified })
}
