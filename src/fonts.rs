//! Font registry: maps family names to TrueType files and caches loaded families.
//!
//! genpdf measures text with TrueType metrics even when a built-in PDF font is
//! used for output, so every family needs font files on disk. The three
//! built-in families (Courier, Helvetica, Times) are backed by metric-compatible
//! free fonts; any other name is looked up verbatim and embedded.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use genpdf::fonts::{self, Builtin, FontData, FontFamily};
use tracing::{debug, info};

use crate::error::{PdfPipeError, Result};

/// How deep below each search directory font files are looked for
const MAX_SEARCH_DEPTH: usize = 4;

const MONO_CANDIDATES: &[&str] = &["LiberationMono", "DejaVuSansMono", "FreeMono", "Cousine"];
const SANS_CANDIDATES: &[&str] = &["LiberationSans", "DejaVuSans", "FreeSans", "Arimo"];
const SERIF_CANDIDATES: &[&str] = &["LiberationSerif", "DejaVuSerif", "FreeSerif", "Tinos"];

const REGULAR_SUFFIXES: &[&str] = &["-Regular", "", "-Book", "-Roman", "-Medium"];
const BOLD_SUFFIXES: &[&str] = &["-Bold"];
const ITALIC_SUFFIXES: &[&str] = &["-Italic", "-Oblique"];
const BOLD_ITALIC_SUFFIXES: &[&str] = &["-BoldItalic", "-BoldOblique"];

/// A loaded family and how it ends up in the PDF
#[derive(Clone, Debug)]
pub struct LoadedFont {
    pub family: FontFamily<FontData>,
    /// Output uses a built-in PDF font, limited to Windows-1252 text
    pub builtin: bool,
    /// File the regular face was read from
    pub source: PathBuf,
}

/// Built-in PDF font and metric candidates for a family name, if it is one of the standard three
pub fn builtin_family(name: &str) -> Option<(Builtin, &'static [&'static str])> {
    match name.to_ascii_lowercase().as_str() {
        "courier" | "courier new" => Some((Builtin::Courier, MONO_CANDIDATES)),
        "helvetica" | "arial" => Some((Builtin::Helvetica, SANS_CANDIDATES)),
        "times" | "times-roman" | "times new roman" => Some((Builtin::Times, SERIF_CANDIDATES)),
        _ => None,
    }
}

/// Common per-platform font directories
pub fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = [
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/System/Library/Fonts",
        "/Library/Fonts",
        "C:\\Windows\\Fonts",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();

    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
        dirs.push(home.join("Library/Fonts"));
    }

    dirs
}

/// Locates and loads font families, caching them by name
pub struct FontRegistry {
    search_dirs: Vec<PathBuf>,
    /// Lowercased file name to first matching path, built on first lookup
    index: Option<HashMap<String, PathBuf>>,
    cache: HashMap<String, LoadedFont>,
}

impl FontRegistry {
    /// Registry searching `extra_dirs`, then `./fonts`, then the system font directories
    pub fn new(extra_dirs: &[PathBuf]) -> Self {
        let mut dirs = extra_dirs.to_vec();
        dirs.push(PathBuf::from("./fonts"));
        dirs.extend(system_font_dirs());
        Self::with_dirs(dirs)
    }

    /// Registry searching exactly `dirs`
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self {
            search_dirs: dirs,
            index: None,
            cache: HashMap::new(),
        }
    }

    /// Load or get a cached font family
    pub fn load(&mut self, name: &str) -> Result<LoadedFont> {
        let key = name.to_ascii_lowercase();
        if let Some(font) = self.cache.get(&key) {
            return Ok(font.clone());
        }

        let font = match builtin_family(name) {
            Some((builtin, candidates)) => self.load_builtin(name, builtin, candidates)?,
            None => self
                .load_embedded(name)?
                .ok_or_else(|| PdfPipeError::UnsupportedFont {
                    name: name.to_string(),
                })?,
        };

        info!(
            "Loaded font '{}' from {} (builtin: {})",
            name,
            font.source.display(),
            font.builtin
        );
        self.cache.insert(key, font.clone());
        Ok(font)
    }

    fn load_builtin(
        &mut self,
        name: &str,
        builtin: Builtin,
        candidates: &[&str],
    ) -> Result<LoadedFont> {
        for candidate in candidates {
            // genpdf's own naming scheme lets the built-in font be referenced directly
            let regular_file = format!("{}-Regular.ttf", candidate);
            if let Some(path) = self.find_file(&regular_file) {
                if let Some(dir) = path.parent() {
                    match fonts::from_files(dir, candidate, Some(builtin)) {
                        Ok(family) => {
                            return Ok(LoadedFont {
                                family,
                                builtin: true,
                                source: path,
                            })
                        }
                        Err(e) => debug!("Could not use {} as built-in metrics: {}", candidate, e),
                    }
                }
            }

            if let Some(font) = self.load_embedded(candidate)? {
                info!(
                    "Embedding '{}' for font '{}' (no built-in metrics available)",
                    candidate, name
                );
                return Ok(font);
            }
        }

        Err(PdfPipeError::UnsupportedFont {
            name: name.to_string(),
        })
    }

    /// Load a family for embedding, or `None` when no regular face exists
    fn load_embedded(&mut self, name: &str) -> Result<Option<LoadedFont>> {
        let regular_path = match self.find_variant(name, REGULAR_SUFFIXES) {
            Some(path) => path,
            None => return Ok(None),
        };

        let regular = load_face(name, &regular_path)?;
        let bold = self.load_optional_face(name, BOLD_SUFFIXES)?;
        let italic = self.load_optional_face(name, ITALIC_SUFFIXES)?;
        let bold_italic = self.load_optional_face(name, BOLD_ITALIC_SUFFIXES)?;

        let family = FontFamily {
            bold: bold.unwrap_or_else(|| regular.clone()),
            italic: italic.unwrap_or_else(|| regular.clone()),
            bold_italic: bold_italic.unwrap_or_else(|| regular.clone()),
            regular,
        };

        Ok(Some(LoadedFont {
            family,
            builtin: false,
            source: regular_path,
        }))
    }

    fn load_optional_face(&mut self, name: &str, suffixes: &[&str]) -> Result<Option<FontData>> {
        match self.find_variant(name, suffixes) {
            Some(path) => load_face(name, &path).map(Some),
            None => Ok(None),
        }
    }

    fn find_variant(&mut self, name: &str, suffixes: &[&str]) -> Option<PathBuf> {
        suffixes
            .iter()
            .find_map(|suffix| self.find_file(&format!("{}{}.ttf", name, suffix)))
    }

    /// First file with this name (case-insensitive) in search order
    pub fn find_file(&mut self, file_name: &str) -> Option<PathBuf> {
        let dirs = &self.search_dirs;
        let index = self.index.get_or_insert_with(|| build_index(dirs));
        index.get(&file_name.to_ascii_lowercase()).cloned()
    }
}

fn load_face(name: &str, path: &Path) -> Result<FontData> {
    debug!("Loading font file {}", path.display());
    FontData::load(path, None).map_err(|e| PdfPipeError::FontLoading {
        name: name.to_string(),
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn build_index(dirs: &[PathBuf]) -> HashMap<String, PathBuf> {
    let mut index = HashMap::new();
    for dir in dirs {
        index_dir(dir, 0, &mut index);
    }
    debug!("Indexed {} font files", index.len());
    index
}

fn index_dir(dir: &Path, depth: usize, index: &mut HashMap<String, PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            if file_name.to_ascii_lowercase().ends_with(".ttf") {
                index.entry(file_name.to_ascii_lowercase()).or_insert(path);
            }
        }
    }

    if depth < MAX_SEARCH_DEPTH {
        subdirs.sort();
        for subdir in subdirs {
            index_dir(&subdir, depth + 1, index);
        }
    }
}
