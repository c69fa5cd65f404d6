// src/config.rs

//! Input loading utilities.
//!
//! Both the article list and the auxiliary vocabulary manifest use the same
//! counted-list format: a first line holding N, followed by N entries, one
//! per line. Paths listed in a file resolve against that file's directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::Vocabulary;

/// Everything needed before ingestion starts.
#[derive(Debug, Clone)]
pub struct RunInputs {
    pub files: Vec<PathBuf>,
    pub vocabulary: Vocabulary,
}

/// Read a counted list file.
pub fn read_counted_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::config(format!("Cannot read {}: {e}", path.display())))?;
    let mut lines = content.lines();

    let header = lines
        .next()
        .ok_or_else(|| AppError::config(format!("{} is empty", path.display())))?;
    let count: usize = header.trim().parse().map_err(|e| {
        AppError::config(format!(
            "{}: invalid entry count {:?}: {e}",
            path.display(),
            header.trim()
        ))
    })?;

    let entries: Vec<String> = lines.take(count).map(|l| l.trim().to_string()).collect();
    if entries.len() < count {
        return Err(AppError::config(format!(
            "{}: expected {count} entries, found {}",
            path.display(),
            entries.len()
        )));
    }
    Ok(entries)
}

fn base_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new(""))
}

/// Load the list of article documents.
pub fn load_article_files(list_path: &Path) -> Result<Vec<PathBuf>> {
    let base = base_dir(list_path);
    Ok(read_counted_list(list_path)?
        .into_iter()
        .map(|entry| base.join(entry))
        .collect())
}

/// Load languages, categories and linking words from the auxiliary manifest.
pub fn load_vocabulary(aux_path: &Path) -> Result<Vocabulary> {
    let entries = read_counted_list(aux_path)?;
    let [languages, categories, linking_words] = match entries.as_slice() {
        [l, c, w, ..] => [l, c, w],
        _ => {
            return Err(AppError::config(format!(
                "{}: expected languages, categories and linking-word files",
                aux_path.display()
            )));
        }
    };

    let base = base_dir(aux_path);
    Ok(Vocabulary::new(
        read_counted_list(&base.join(languages))?,
        read_counted_list(&base.join(categories))?,
        read_counted_list(&base.join(linking_words))?,
    ))
}

/// Load and validate every run input.
pub fn load_all(articles_list: &Path, aux_path: &Path) -> Result<RunInputs> {
    let vocabulary = load_vocabulary(aux_path)?;
    let files = load_article_files(articles_list)?;
    log::info!(
        "Loaded {} languages, {} categories, {} linking words, {} documents",
        vocabulary.language_count(),
        vocabulary.category_count(),
        vocabulary.linking_word_count(),
        files.len()
    );
    Ok(RunInputs { files, vocabulary })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_counted_list_trims_entries() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "list.txt", " 2 \n  english \nfrench\nignored\n");

        assert_eq!(read_counted_list(&path).unwrap(), vec!["english", "french"]);
    }

    #[test]
    fn test_counted_list_too_short() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "list.txt", "3\na\nb\n");
        assert!(matches!(read_counted_list(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn test_counted_list_bad_count() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "list.txt", "many\na\n");
        assert!(matches!(read_counted_list(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn test_counted_list_missing_file() {
        let result = read_counted_list(Path::new("/nonexistent/list.txt"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_article_paths_resolve_against_list_dir() {
        let tmp = TempDir::new().unwrap();
        let list = write(&tmp, "input/articles.txt", "2\ndata/a.json\nb.json\n");

        let files = load_article_files(&list).unwrap();
        assert_eq!(files[0], tmp.path().join("input/data/a.json"));
        assert_eq!(files[1], tmp.path().join("input/b.json"));
    }

    #[test]
    fn test_load_vocabulary() {
        let tmp = TempDir::new().unwrap();
        write(&tmp, "aux/languages.txt", "2\nenglish\nfrench\n");
        write(&tmp, "aux/categories.txt", "2\nSport\nWorld News\n");
        write(&tmp, "aux/linking.txt", "1\nthe\n");
        let aux = write(&tmp, "aux/inputs.txt", "3\nlanguages.txt\ncategories.txt\nlinking.txt\n");

        let vocab = load_vocabulary(&aux).unwrap();
        assert!(vocab.is_language("french"));
        assert_eq!(vocab.category_key("World,News World").as_deref(), None);
        assert_eq!(vocab.category_key("World News").as_deref(), Some("World_News"));
        assert!(vocab.is_linking_word("the"));
    }

    #[test]
    fn test_vocabulary_requires_three_files() {
        let tmp = TempDir::new().unwrap();
        let aux = write(&tmp, "inputs.txt", "2\nlanguages.txt\ncategories.txt\n");
        assert!(matches!(load_vocabulary(&aux), Err(AppError::Config(_))));
    }
}
