//! Init command implementation
//!
//! Scaffolds `lexis.toml`, `.env.example` and `.gitignore` entries for a
//! working directory.

use super::output::Output;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// lexis.toml already exists
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// API base URL written into lexis.toml
    pub base_url: String,
    /// Keep credentials in memory instead of a file
    pub memory_storage: bool,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing Lexis");

    let base_path = &config.path;
    if let Err(e) = fs::create_dir_all(base_path) {
        output.error(&format!("Failed to create {}: {}", base_path.display(), e));
        return InitResult::Error(e.to_string());
    }

    let config_path = base_path.join("lexis.toml");
    if config_path.exists() && !config.force {
        output.warning("lexis.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    output.subheader("Creating configuration files");

    if let Err(e) = write_file(&config_path, &generate_lexis_toml(&config), config.force) {
        output.error(&format!("Failed to create lexis.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", "lexis.toml");

    let env_example_path = base_path.join(".env.example");
    if env_example_path.exists() && !config.force {
        output.skipped(".env.example", "already exists");
    } else if let Err(e) = write_file(&env_example_path, &generate_env_example(), config.force) {
        output.error(&format!("Failed to create .env.example: {}", e));
        return InitResult::Error(e.to_string());
    } else {
        output.created("env", ".env.example");
    }

    match ensure_gitignore(&base_path.join(".gitignore")) {
        Ok(true) => output.created("file", ".gitignore"),
        Ok(false) => output.skipped(".gitignore", "credentials already ignored"),
        Err(e) => output.warning(&format!("Failed to update .gitignore: {}", e)),
    }

    output.header("Next Steps");
    output.newline();
    output.info("1. Start a local backend (optional):");
    output.command("lexis mock-server");
    output.newline();
    output.info("2. Sign in:");
    output.command("lexis login --email you@example.com");
    output.newline();
    output.info("3. Upload and analyze a contract:");
    output.command("lexis documents upload contract.pdf --analyze");

    output.hint(&format!("Requests go to {}", config.base_url));

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

/// Append the credential directory to `.gitignore`. Returns whether the file changed.
fn ensure_gitignore(path: &Path) -> std::io::Result<bool> {
    let existing = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };
    if existing.lines().any(|line| line.trim() == ".lexis/") {
        return Ok(false);
    }

    let mut content = existing;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str("# Lexis credentials\n.lexis/\n.env\n");
    fs::write(path, content)?;
    Ok(true)
}

fn generate_lexis_toml(config: &InitConfig) -> String {
    let backend = if config.memory_storage {
        "memory"
    } else {
        "file"
    };

    format!(
        r#"# Lexis configuration
# Every value below is optional; the defaults are shown.

[api]
# Base URL every API path is resolved against (LEXIS_API_BASE_URL)
base_url = "{base_url}"
# Fixed timeout for every request, in seconds (LEXIS_TIMEOUT_SECS)
timeout_secs = 10

[storage]
# "file" keeps you signed in across runs, "memory" forgets on exit
backend = "{backend}"
# Credential file for the file backend (LEXIS_STORAGE_PATH)
path = ".lexis/credentials.json"

[logging]
# Overridden by RUST_LOG when set
level = "info"
# "pretty" or "json"
format = "pretty"

[mock]
# Used by `lexis mock-server`
host = "127.0.0.1"
port = 8000
access_ttl_secs = 300
"#,
        base_url = config.base_url,
        backend = backend,
    )
}

fn generate_env_example() -> String {
    r#"# Lexis environment overrides
# Copy to .env and adjust as needed.

# LEXIS_API_BASE_URL=http://127.0.0.1:8000/api/
# LEXIS_TIMEOUT_SECS=10
# LEXIS_STORAGE_PATH=.lexis/credentials.json
# RUST_LOG=lexis=debug
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexis::utils::toml_config::{LexisConfig, StorageBackend};
    use tempfile::TempDir;

    fn create_test_config(temp_dir: &TempDir) -> InitConfig {
        InitConfig {
            path: temp_dir.path().to_path_buf(),
            force: false,
            base_url: "http://127.0.0.1:8000/api/".to_string(),
            memory_storage: false,
        }
    }

    #[test]
    fn test_generated_toml_loads_back() {
        let temp_dir = TempDir::new().unwrap();
        let mut init = create_test_config(&temp_dir);
        init.base_url = "https://lexis.example.com/api/".to_string();
        init.memory_storage = true;

        let path = temp_dir.path().join("lexis.toml");
        fs::write(&path, generate_lexis_toml(&init)).unwrap();

        let config = LexisConfig::load(&path).unwrap();
        assert_eq!(config.api.base_url, "https://lexis.example.com/api/");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.mock.port, 8000);
    }

    #[test]
    fn test_run_creates_files() {
        let temp_dir = TempDir::new().unwrap();
        let output = Output::no_color();

        let result = run(create_test_config(&temp_dir), &output);

        assert!(matches!(result, InitResult::Success));
        assert!(temp_dir.path().join("lexis.toml").exists());
        assert!(temp_dir.path().join(".env.example").exists());
        let gitignore = fs::read_to_string(temp_dir.path().join(".gitignore")).unwrap();
        assert!(gitignore.contains(".lexis/"));
    }

    #[test]
    fn test_run_refuses_to_overwrite_without_force() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("lexis.toml"), "# mine").unwrap();
        let output = Output::no_color();

        let result = run(create_test_config(&temp_dir), &output);
        assert!(matches!(result, InitResult::AlreadyExists));
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("lexis.toml")).unwrap(),
            "# mine"
        );

        let mut forced = create_test_config(&temp_dir);
        forced.force = true;
        assert!(matches!(run(forced, &output), InitResult::Success));
        assert!(fs::read_to_string(temp_dir.path().join("lexis.toml"))
            .unwrap()
            .contains("[api]"));
    }

    #[test]
    fn test_gitignore_is_appended_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".gitignore");
        fs::write(&path, "/target").unwrap();

        assert!(ensure_gitignore(&path).unwrap());
        assert!(!ensure_gitignore(&path).unwrap());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("/target\n"));
        assert_eq!(content.matches(".lexis/").count(), 1);
    }
}
