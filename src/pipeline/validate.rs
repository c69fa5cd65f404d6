// src/pipeline/validate.rs

use std::path::Path;

use crate::config::{RunInputs, load_all};
use crate::error::Result;
use crate::models::Config;

/// Validate the config and load every input without ingesting anything.
pub fn run_validate(config: &Config, articles_list: &Path, aux_path: &Path) -> Result<RunInputs> {
    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }
    log::info!(
        "Config OK: {} workers, {} lock stripes, output to {}",
        config.ingest.workers,
        config.ingest.lock_stripes,
        config.output.dir
    );

    match load_all(articles_list, aux_path) {
        Ok(inputs) => {
            let missing = inputs.files.iter().filter(|f| !f.exists()).count();
            if missing > 0 {
                log::warn!("{} of {} listed documents do not exist", missing, inputs.files.len());
            }
            Ok(inputs)
        }
        Err(e) => {
            log::error!("Input validation failed: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_validate_loads_inputs() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        fs::write(dir.join("languages.txt"), "1\nenglish\n").unwrap();
        fs::write(dir.join("categories.txt"), "1\nSport\n").unwrap();
        fs::write(dir.join("linking.txt"), "0\n").unwrap();
        fs::write(dir.join("aux.txt"), "3\nlanguages.txt\ncategories.txt\nlinking.txt\n").unwrap();
        fs::write(dir.join("articles.txt"), "1\nmissing.json\n").unwrap();

        let inputs =
            run_validate(&Config::default(), &dir.join("articles.txt"), &dir.join("aux.txt")).unwrap();
        assert_eq!(inputs.files.len(), 1);
        assert!(inputs.vocabulary.is_language("english"));
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let mut config = Config::default();
        config.ingest.workers = 0;
        let result = run_validate(&config, Path::new("a"), Path::new("b"));
        assert!(result.is_err());
    }
}
