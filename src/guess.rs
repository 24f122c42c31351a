use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use regex::Regex;

use crate::language::{is_subtitle, normalize_language_token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Movie,
    Episode,
}

/// What a guesser could infer from a file name. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGuess {
    pub kind: Option<MediaKind>,
    pub title: Option<String>,
    pub year: Option<u16>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub subtitle_language: Option<String>,
}

pub trait Guesser: Send + Sync {
    fn guess(&self, file_name: &str) -> RawGuess;
}

// Release tags that end the title part of a name
const JUNK_TOKENS: &[&str] = &[
    // Torrent sites and groups
    "yts", "yts.mx", "yify", "rarbg", "1337x", "tgx", "eztv", "ettv",
    // Video quality and source
    "4k", "uhd", "hdtv", "bluray", "blu-ray", "brrip", "bdrip", "dvdrip", "webrip", "web-dl",
    "webdl", "web", "camrip", "hdrip", "screener", "r5", "hdr", "hdr10", "dv", "remux",
    // Video codecs
    "x264", "x265", "h264", "h265", "hevc", "avc", "xvid", "divx", "vp9", "av1", "10bit",
    // Audio codecs
    "aac", "ac3", "dts", "mp3", "flac", "atmos", "dts-hd", "ddp5", "dd5", "truehd",
    // Release info
    "extended", "unrated", "remastered", "limited", "internal", "proper", "repack",
    "multi", "truefrench", "vostfr", "subbed", "dubbed",
];

/// Regex heuristics for scene and hand-made release names.
#[derive(Debug)]
pub struct ReleaseNameGuesser {
    episode_patterns: Vec<Regex>,
    year_pattern: Regex,
    trailing_year: Regex,
    resolution: Regex,
    brackets: Regex,
    junk: HashSet<&'static str>,
}

impl ReleaseNameGuesser {
    pub fn new() -> Result<Self> {
        let episode_patterns = vec![
            // Show.Name.S01E02, Show Name s1e02
            Regex::new(r"(?i)^(?P<title>.*?)[\s._-]*\bS(?P<season>\d{1,2})[\s._-]?E(?P<episode>\d{1,3})")?,
            // Show.Name.1x02
            Regex::new(r"(?i)^(?P<title>.*?)[\s._-]*\b(?P<season>\d{1,2})x(?P<episode>\d{2,3})\b")?,
            // Show Name Season 1 Episode 2
            Regex::new(
                r"(?i)^(?P<title>.*?)[\s._-]*\bseason[\s._-]*(?P<season>\d{1,2})[\s._-]*episode[\s._-]*(?P<episode>\d{1,3})",
            )?,
        ];

        Ok(Self {
            episode_patterns,
            year_pattern: Regex::new(r"(?:^|[\s._(\[-])(?P<year>(?:19|20)\d{2})")?,
            trailing_year: Regex::new(r"^(?P<title>.*\S)\s+\(?(?P<year>(?:19|20)\d{2})\)?$")?,
            resolution: Regex::new(r"(?i)^\d{3,4}[pi]$")?,
            brackets: Regex::new(r"\[[^\]]*\]|\([^)]*\)|\{[^}]*\}")?,
            junk: JUNK_TOKENS.iter().copied().collect(),
        })
    }

    fn clean_title(&self, raw: &str) -> Option<String> {
        let without_groups = self.brackets.replace_all(raw, " ");
        let spaced: String = without_groups
            .chars()
            .map(|c| if matches!(c, '.' | '_' | '+') { ' ' } else { c })
            .collect();

        let words: Vec<&str> = spaced
            .split_whitespace()
            .take_while(|word| !self.is_junk(word))
            .collect();

        let title = words
            .join(" ")
            .trim_matches(&['-', ' ', ',', '(', '[', ')', ']'] as &[char])
            .to_string();

        if title.is_empty() { None } else { Some(title) }
    }

    fn is_junk(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.junk.contains(lower.as_str()) || self.resolution.is_match(&lower)
    }

    // "Doctor Who 2005" -> ("Doctor Who", 2005)
    fn split_trailing_year(&self, title: String) -> (String, Option<u16>) {
        if let Some(caps) = self.trailing_year.captures(&title) {
            let year = caps["year"].parse().ok();
            return (caps["title"].to_string(), year);
        }
        (title, None)
    }

    fn guess_episode(&self, stem: &str) -> Option<RawGuess> {
        for pattern in &self.episode_patterns {
            if let Some(caps) = pattern.captures(stem) {
                let (title, year) = match self.clean_title(&caps["title"]) {
                    Some(title) => {
                        let (title, year) = self.split_trailing_year(title);
                        (Some(title), year)
                    }
                    None => (None, None),
                };

                return Some(RawGuess {
                    kind: Some(MediaKind::Episode),
                    title,
                    year,
                    season: caps["season"].parse().ok(),
                    episode: caps["episode"].parse().ok(),
                    subtitle_language: None,
                });
            }
        }
        None
    }

    fn guess_movie(&self, stem: &str) -> RawGuess {
        // The last year preceded by some text wins: "1917.2019" is the film 1917
        let year_match = self
            .year_pattern
            .captures_iter(stem)
            .filter_map(|caps| caps.name("year"))
            .filter(|m| m.start() > 0 && ends_token(stem, m.end()))
            .last();

        let (title, year) = match year_match {
            Some(m) => (self.clean_title(&stem[..m.start()]), m.as_str().parse().ok()),
            None => (self.clean_title(stem), None),
        };

        RawGuess {
            kind: Some(MediaKind::Movie),
            title,
            year,
            ..RawGuess::default()
        }
    }
}

impl Guesser for ReleaseNameGuesser {
    fn guess(&self, file_name: &str) -> RawGuess {
        let path = Path::new(file_name);
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        let mut stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name)
            .to_string();

        let mut subtitle_language = None;
        if is_subtitle(&extension) {
            if let Some((rest, lang)) = split_language_suffix(&stem) {
                subtitle_language = Some(lang.to_string());
                stem = rest.to_string();
            }
        }

        let mut guess = self
            .guess_episode(&stem)
            .unwrap_or_else(|| self.guess_movie(&stem));
        guess.subtitle_language = subtitle_language;
        guess
    }
}

fn ends_token(text: &str, end: usize) -> bool {
    text[end..]
        .chars()
        .next()
        .is_none_or(|c| !c.is_ascii_alphanumeric())
}

// "Lost.S01E02.fr" -> ("Lost.S01E02", "fre")
fn split_language_suffix(stem: &str) -> Option<(&str, &'static str)> {
    let idx = stem.rfind(['.', '_', '-', ' '])?;
    let code = normalize_language_token(&stem[idx + 1..])?;
    Some((&stem[..idx], code))
}
