use std::env;

pub const DEFAULT_HOST: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";

/// Where the host server and TMDB live. The binaries load `.env` before calling
/// [`Config::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub tmdb_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            tmdb_base: DEFAULT_TMDB_BASE.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let host = env::var("REELVIEW_HOST")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let tmdb_base = env::var("TMDB_API_BASE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TMDB_BASE.to_string());
        Self::new(&host, &tmdb_base)
    }

    pub fn new(host: &str, tmdb_base: &str) -> Self {
        Self {
            host: host.trim().trim_end_matches('/').to_string(),
            tmdb_base: tmdb_base.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn host_url(&self, path: &str) -> String {
        format!("{}/{}", self.host, path.trim_start_matches('/'))
    }
}
