use std::path::PathBuf;

use crate::media::Identity;

/// Library layout: `movies/Title (Year)/...` and `series/Show/Season NN/...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFormat {
    pub movie_prefix: String,
    pub tvshow_prefix: String,
}

impl Default for PathFormat {
    fn default() -> Self {
        Self {
            movie_prefix: "movies".to_string(),
            tvshow_prefix: "series".to_string(),
        }
    }
}

impl PathFormat {
    /// Render the relative destination of a file identified as `identity`.
    pub fn format(&self, identity: &Identity, extension: &str, language: Option<&str>) -> PathBuf {
        let ext = match language.filter(|l| !l.is_empty()) {
            Some(lang) => format!("{}.{}", lang, extension),
            None => extension.to_string(),
        };

        match identity {
            Identity::Movie { title, year } => {
                let title = sanitize_filename(title);
                let name = match year.as_deref().filter(|y| !y.is_empty()) {
                    Some(year) => format!("{} ({})", title, year),
                    None => title,
                };
                PathBuf::from(&self.movie_prefix)
                    .join(&name)
                    .join(format!("{}.{}", name, ext))
            }
            Identity::Episode {
                show,
                season,
                episode,
                title,
            } => {
                let show = sanitize_filename(show);
                let title = sanitize_filename(title);
                PathBuf::from(&self.tvshow_prefix)
                    .join(&show)
                    .join(format!("Season {:02}", season))
                    .join(format!(
                        "{} - S{:02}E{:02} - {}.{}",
                        show, season, episode, title, ext
                    ))
            }
        }
    }
}

/// Format with the default `movies`/`series` prefixes.
pub fn format_path(identity: &Identity, extension: &str, language: Option<&str>) -> PathBuf {
    PathFormat::default().format(identity, extension, language)
}

// Characters that are not allowed in a single path segment
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
