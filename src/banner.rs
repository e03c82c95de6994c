use crate::source::{FetchOptions, Source};

const BANNER_DIR: &str = "img";
const BANNER_EXTENSIONS: &[&str] = &["png", "webp", "jpg", "jpeg"];

/// Relative banner paths to try for a team, in order.
pub fn team_banner_candidates(team: &str) -> Vec<String> {
    let raw = team.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    let safe = raw
        .replace("../", "")
        .replace("..\\", "")
        .replace(['/', '\\'], "_");
    let base = strip_image_extension(&safe);
    let encoded = encode_uri_component(base);
    BANNER_EXTENSIONS
        .iter()
        .map(|ext| format!("{BANNER_DIR}/{encoded}.{ext}"))
        .collect()
}

/// First candidate that resolves against `source`; stops probing on the first hit.
pub fn resolve_first(source: &Source, candidates: &[String], opts: &FetchOptions) -> Option<String> {
    candidates
        .iter()
        .find(|rel| source.exists(rel, opts))
        .map(|rel| source.locator(rel))
}

pub fn resolve_team_banner(source: &Source, team: &str, opts: &FetchOptions) -> Option<String> {
    resolve_first(source, &team_banner_candidates(team), opts)
}

fn strip_image_extension(name: &str) -> &str {
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return name;
    };
    if BANNER_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)) {
        stem
    } else {
        name
    }
}

fn encode_uri_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        let keep = byte.is_ascii_alphanumeric()
            || matches!(byte, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')');
        if keep {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn candidates_are_sanitized_and_encoded() {
        let c = team_banner_candidates(" Red Bull ");
        assert_eq!(
            c,
            vec![
                "img/Red%20Bull.png",
                "img/Red%20Bull.webp",
                "img/Red%20Bull.jpg",
                "img/Red%20Bull.jpeg"
            ]
        );
        let c = team_banner_candidates("../secret/Team.PNG");
        assert_eq!(c[0], "img/secret_Team.png");
        assert!(team_banner_candidates("  ").is_empty());
        assert_eq!(encode_uri_component("Peñarol"), "Pe%C3%B1arol");
    }

    #[test]
    fn resolves_first_existing_file() {
        let dir: PathBuf = std::env::temp_dir().join(format!(
            "paddock_standings_banner_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("img")).unwrap();
        fs::write(dir.join("img/Ferrari.jpg"), b"x").unwrap();
        fs::write(dir.join("img/Ferrari.jpeg"), b"x").unwrap();

        let source = Source::Dir(dir.clone());
        let opts = FetchOptions::default();
        let hit = resolve_team_banner(&source, "Ferrari", &opts).unwrap();
        assert!(hit.ends_with("Ferrari.jpg"));
        assert!(resolve_team_banner(&source, "Alpine", &opts).is_none());
        let _ = fs::remove_dir_all(dir);
    }
}
