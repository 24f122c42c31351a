use std::fs;
use std::path::Path;

use tracing::debug;

pub const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "sub", "ass", "ssa", "vtt"];

/// Language codes written into library names are ISO 639-2/B ("eng", "fre").
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Option<String>;
}

/// Statistical detection backed by `whatlang`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let text = strip_subtitle_markup(text);
        if text.trim().is_empty() {
            return None;
        }
        let info = whatlang::detect(&text)?;
        debug!(
            lang = info.lang().code(),
            confidence = info.confidence(),
            reliable = info.is_reliable(),
            "Detected subtitle language"
        );
        // Unreliable guesses leave the file untagged
        if !info.is_reliable() {
            return None;
        }
        Some(bibliographic_code(info.lang().code()).to_string())
    }
}

pub fn is_subtitle(extension: &str) -> bool {
    let extension = extension.to_lowercase();
    SUBTITLE_EXTENSIONS.contains(&extension.as_str())
}

/// Read a subtitle file and detect its language. Any failure yields `None`.
pub fn detect_file_language(detector: &dyn LanguageDetector, path: &Path) -> Option<String> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(path = %path.display(), "Could not read subtitle for language detection: {}", e);
            return None;
        }
    };
    let text = String::from_utf8_lossy(&bytes);
    detector.detect(&text)
}

/// Map a language token as it appears in release names to its 639-2/B code.
pub fn normalize_language_token(token: &str) -> Option<&'static str> {
    let code = match token.to_lowercase().as_str() {
        "en" | "eng" | "english" => "eng",
        "fr" | "fre" | "fra" | "french" | "vf" => "fre",
        "de" | "ger" | "deu" | "german" => "ger",
        "es" | "spa" | "spanish" => "spa",
        "it" | "ita" | "italian" => "ita",
        "pt" | "por" | "portuguese" => "por",
        "nl" | "dut" | "nld" | "dutch" => "dut",
        "ja" | "jpn" | "japanese" => "jpn",
        "ru" | "rus" | "russian" => "rus",
        "pl" | "pol" | "polish" => "pol",
        "sv" | "swe" | "swedish" => "swe",
        _ => return None,
    };
    Some(code)
}

/// whatlang reports ISO 639-3; a handful of those differ from 639-2/B.
fn bibliographic_code(code: &'static str) -> &'static str {
    match code {
        "fra" => "fre",
        "deu" => "ger",
        "nld" => "dut",
        "cmn" | "zho" => "chi",
        "ces" => "cze",
        "ell" => "gre",
        "pes" | "fas" => "per",
        "ron" => "rum",
        "slk" => "slo",
        "isl" => "ice",
        "hye" => "arm",
        "kat" => "geo",
        "mkd" => "mac",
        "mya" => "bur",
        "sqi" => "alb",
        "cym" => "wel",
        other => other,
    }
}

// Drop SRT sequence numbers, timestamps and inline tags so only dialogue is scored
fn strip_subtitle_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.contains("-->") || line.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let mut in_tag = false;
        for ch in line.chars() {
            match ch {
                '<' | '{' => in_tag = true,
                '>' | '}' => in_tag = false,
                _ if !in_tag => out.push(ch),
                _ => {}
            }
        }
        out.push(' ');
    }
    out
}
