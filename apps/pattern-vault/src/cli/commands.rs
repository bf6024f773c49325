//! # CLI Command Implementations

use crate::api::{self, AppState, StatusResponse};
use crate::config::{BackendKind, VaultConfig};
use crate::input::{DraftFile, normalize_search};
use crate::storage::{
    MAX_PATTERN_FILE_SIZE, open_catalog, read_records, save_catalog, validate_file_path,
    validate_file_size, validate_output_path, write_snapshot,
};
use pattern_core::{
    CodePatternRecord, FilterCompiler, PatternError, PatternId, RedbStore, SearchRequest,
};
use std::path::Path;

fn print_json(value: &impl serde::Serialize) -> Result<(), PatternError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| PatternError::SerializationError(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

fn print_record_line(record: &CodePatternRecord) {
    let rating = record
        .user_rating()
        .map_or_else(|| "unrated".to_string(), |r| format!("{:.1}", r));
    println!(
        "  {:<32} v{:<3} {:<12} {:<12} cc={:<3} doc={:.2} rating={}",
        record.id().as_str(),
        record.version(),
        record.language(),
        record.complexity_level().as_str(),
        record.quality_metrics().cyclomatic_complexity,
        record.quality_metrics().documentation_coverage,
        rating
    );
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: VaultConfig) -> Result<(), PatternError> {
    let catalog = open_catalog(&config)?;

    println!("Pattern Vault Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", config.host);
    println!("  Port:     {}", config.port);
    println!("  Backend:  {}", config.backend);
    println!("  Database: {:?}", config.database);
    println!();
    println!("Endpoints:");
    println!("  GET  /health                 - Health check");
    println!("  GET  /status                 - Catalog statistics");
    println!("  POST /patterns               - Store a pattern");
    println!("  GET  /patterns/{{id}}          - Fetch a pattern");
    println!("  GET  /patterns/{{id}}/history  - Version chain");
    println!("  POST /search                 - Filtered search");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = config.bind_address();
    api::run_server(&addr, AppState::new(catalog, config)).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show catalog statistics.
pub fn cmd_status(config: &VaultConfig, json_mode: bool) -> Result<(), PatternError> {
    let catalog = open_catalog(config)?;
    let stats = catalog.stats()?;

    if json_mode {
        return print_json(&StatusResponse::from_stats(config.backend.as_str(), &stats));
    }

    println!("Pattern Vault Status");
    println!("====================");
    println!("Database: {:?}", config.database);
    println!("Backend:  {}", config.backend);
    println!();
    println!("Records:        {}", stats.record_count);
    println!("Families:       {}", stats.family_count);
    println!("Rated:          {}", stats.rated_count);
    println!("Mean doc cover: {}%", stats.mean_coverage_percent);
    println!();
    println!("By complexity:");
    for (level, count) in &stats.by_complexity {
        println!("  {:<13} {}", level.as_str(), count);
    }
    if !stats.by_language.is_empty() {
        println!("By language:");
        for (language, count) in &stats.by_language {
            println!("  {:<13} {}", language, count);
        }
    }

    Ok(())
}

// =============================================================================
// STORE COMMAND
// =============================================================================

/// Build and store every draft in a JSON pattern file, in file order.
///
/// Stops at the first rejected draft; earlier drafts stay stored.
pub fn cmd_store(config: &VaultConfig, json_mode: bool, file: &Path) -> Result<(), PatternError> {
    let validated_path = validate_file_path(file)?;
    validate_file_size(&validated_path, MAX_PATTERN_FILE_SIZE)?;
    let contents = std::fs::read(&validated_path)
        .map_err(|e| PatternError::IoError(format!("Read file: {}", e)))?;
    let drafts = DraftFile::parse(&contents)?;

    tracing::info!("Storing {} pattern(s) from {:?}", drafts.len(), file);

    let mut catalog = open_catalog(config)?;
    let mut stored = Vec::with_capacity(drafts.len());
    let mut failure = None;
    for draft in &drafts {
        match catalog.submit(draft) {
            Ok(record) => stored.push(record),
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }
    save_catalog(&catalog, config)?;

    if json_mode {
        print_json(&stored)?;
    } else {
        println!("Stored {} of {} pattern(s)", stored.len(), drafts.len());
        for record in &stored {
            print_record_line(record);
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

// =============================================================================
// SHOW / HISTORY COMMANDS
// =============================================================================

/// Show one record.
pub fn cmd_show(config: &VaultConfig, json_mode: bool, id: &str) -> Result<(), PatternError> {
    let catalog = open_catalog(config)?;
    let record = catalog.require(&PatternId::from(id))?;

    if json_mode {
        return print_json(&record);
    }

    let info = record.version_info();
    println!("{} (version {})", record.name(), record.version());
    println!("  Id:           {}", record.id());
    println!("  Language:     {}", record.language());
    println!("  Complexity:   {}", record.complexity_level());
    println!(
        "  Metrics:      cyclomatic={} documentation={:.2}",
        record.quality_metrics().cyclomatic_complexity,
        record.quality_metrics().documentation_coverage
    );
    match record.user_rating() {
        Some(r) => println!("  Rating:       {:.1}", r),
        None => println!("  Rating:       unrated"),
    }
    if !record.tags().is_empty() {
        let tags: Vec<&str> = record.tags().iter().map(String::as_str).collect();
        println!("  Tags:         {}", tags.join(", "));
    }
    if !record.dependencies().is_empty() {
        println!("  Dependencies: {}", record.dependencies().join(", "));
    }
    if let Some(previous) = &info.previous_version_id {
        println!("  Previous:     {}", previous);
    }
    if let Some(change_log) = &info.change_log {
        println!("  Change log:   {}", change_log);
    }
    println!("  Updated:      {}", info.updated_at.to_rfc3339());
    println!();
    println!("{}", record.explanation());
    println!();
    println!("{}", record.code());

    Ok(())
}

/// Show the version chain ending at `id`.
pub fn cmd_history(config: &VaultConfig, json_mode: bool, id: &str) -> Result<(), PatternError> {
    let catalog = open_catalog(config)?;
    let history = catalog.history(&PatternId::from(id))?;

    if json_mode {
        return print_json(&history);
    }

    println!("History of {} ({} version(s), newest first):", id, history.len());
    for record in &history {
        print_record_line(record);
        if let Some(change_log) = &record.version_info().change_log {
            println!("      {}", change_log);
        }
    }
    Ok(())
}

// =============================================================================
// FIND COMMAND
// =============================================================================

/// Filtered search; prints at most `limit` results.
pub fn cmd_find(
    config: &VaultConfig,
    json_mode: bool,
    request: SearchRequest,
    limit: usize,
) -> Result<(), PatternError> {
    let request = normalize_search(request)?;
    let compiled = FilterCompiler::compile(&request);
    let catalog = open_catalog(config)?;
    let mut results = catalog.search_compiled(&compiled)?;
    results.truncate(limit);

    if json_mode {
        return print_json(&serde_json::json!({
            "query": compiled.to_string(),
            "predicate": compiled.predicate.to_string(),
            "results": results,
        }));
    }

    println!("{}", compiled);
    if results.is_empty() {
        println!("No matching patterns");
    }
    for record in &results {
        print_record_line(record);
    }
    Ok(())
}

// =============================================================================
// EXPORT / IMPORT COMMANDS
// =============================================================================

/// Export every record as a snapshot or a JSON list.
pub fn cmd_export(config: &VaultConfig, output: &Path, format: &str) -> Result<(), PatternError> {
    let validated_output = validate_output_path(output)?;
    let records = open_catalog(config)?.records()?;

    match format {
        "snapshot" => write_snapshot(&records, &validated_output)?,
        "json" => {
            let data = serde_json::to_vec_pretty(&records)
                .map_err(|e| PatternError::SerializationError(e.to_string()))?;
            std::fs::write(&validated_output, &data)
                .map_err(|e| PatternError::IoError(format!("Write file: {}", e)))?;
        }
        _ => {
            return Err(PatternError::InvalidInput(format!(
                "Unknown format: {}. Use: snapshot, json",
                format
            )));
        }
    }

    println!(
        "Exported {} record(s) to {:?}",
        records.len(),
        validated_output
    );
    Ok(())
}

/// Import records into the configured store, all or nothing.
pub fn cmd_import(config: &VaultConfig, input: &Path) -> Result<(), PatternError> {
    let records = read_records(input)?;
    let mut catalog = open_catalog(config)?;
    let count = catalog.import(&records)?;
    save_catalog(&catalog, config)?;

    println!(
        "Imported {} record(s); store now holds {}",
        count,
        catalog.len()?
    );
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new empty store.
pub fn cmd_init(config: &VaultConfig, force: bool) -> Result<(), PatternError> {
    let path = &config.database;

    match config.backend {
        BackendKind::Memory => {
            println!("Memory backend needs no initialization");
            return Ok(());
        }
        _ if path.exists() && !force => {
            return Err(PatternError::InvalidInput(
                "Store already exists. Use --force to overwrite.".to_string(),
            ));
        }
        _ if path.exists() => {
            std::fs::remove_file(path)
                .map_err(|e| PatternError::IoError(format!("Remove existing store: {}", e)))?;
        }
        _ => {}
    }

    match config.backend {
        BackendKind::Redb => {
            RedbStore::open(path)?;
            println!("Initialized new redb store at {:?}", path);
        }
        _ => {
            write_snapshot(&[], path)?;
            println!("Initialized new snapshot file at {:?}", path);
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_for(backend: BackendKind, path: &Path) -> VaultConfig {
        VaultConfig {
            database: path.to_path_buf(),
            backend,
            ..VaultConfig::default()
        }
    }

    const CHAIN_JSON: &str = r#"[
        {"name": "Binary Search", "code": "def bs(a, x):\n    '''Find x.'''\n    while a:\n        pass",
         "explanation": "Halve the range", "tags": ["algorithm"], "userRating": 4.5},
        {"name": "Binary Search", "code": "def bs(a, x):\n    '''Find x.'''\n    pass",
         "explanation": "Halve the range", "version": 2, "previousVersionId": "binary_search_1",
         "changeLog": "simplified"}
    ]"#;

    #[test]
    fn store_then_history_on_redb() {
        let dir = tempdir().expect("tempdir");
        let config = config_for(BackendKind::Redb, &dir.path().join("patterns.db"));
        let file = dir.path().join("patterns.json");
        std::fs::write(&file, CHAIN_JSON).expect("write");

        cmd_store(&config, true, &file).expect("store");

        let catalog = open_catalog(&config).expect("open");
        let history = catalog
            .history(&PatternId::from("binary_search_2"))
            .expect("history");
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].quality_metrics().cyclomatic_complexity, 2);
    }

    #[test]
    fn store_reports_first_rejection() {
        let dir = tempdir().expect("tempdir");
        let config = config_for(BackendKind::File, &dir.path().join("patterns.pvlt"));
        let file = dir.path().join("bad.json");
        std::fs::write(
            &file,
            r#"[{"name": "Heap", "code": "h = []", "explanation": "e"},
                {"name": "Heap", "code": "h = []", "explanation": "e",
                 "version": 3, "previousVersionId": "heap_1"}]"#,
        )
        .expect("write");

        let result = cmd_store(&config, true, &file);

        assert!(matches!(result, Err(PatternError::InvalidVersionChain(_))));
        assert_eq!(open_catalog(&config).expect("open").len().expect("len"), 1);
    }

    #[test]
    fn export_then_import_into_fresh_store() {
        let dir = tempdir().expect("tempdir");
        let source = config_for(BackendKind::Redb, &dir.path().join("source.db"));
        let file = dir.path().join("patterns.json");
        std::fs::write(&file, CHAIN_JSON).expect("write");
        cmd_store(&source, true, &file).expect("store");

        for format in ["snapshot", "json"] {
            let exported = dir.path().join(format!("export.{}", format));
            cmd_export(&source, &exported, format).expect("export");

            let target = config_for(
                BackendKind::File,
                &dir.path().join(format!("target-{}.pvlt", format)),
            );
            cmd_import(&target, &exported).expect("import");
            assert_eq!(open_catalog(&target).expect("open").len().expect("len"), 2);
        }
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempdir().expect("tempdir");
        let config = config_for(BackendKind::File, &dir.path().join("patterns.pvlt"));

        cmd_init(&config, false).expect("first init");
        assert!(matches!(
            cmd_init(&config, false),
            Err(PatternError::InvalidInput(_))
        ));
        cmd_init(&config, true).expect("forced init");
    }

    #[test]
    fn unknown_export_format_rejected() {
        let dir = tempdir().expect("tempdir");
        let config = config_for(BackendKind::Memory, &dir.path().join("unused"));
        assert!(matches!(
            cmd_export(&config, &dir.path().join("out.xml"), "xml"),
            Err(PatternError::InvalidInput(_))
        ));
    }

    #[test]
    fn show_missing_record_is_not_found() {
        let dir = tempdir().expect("tempdir");
        let config = config_for(BackendKind::Memory, &dir.path().join("unused"));
        assert!(matches!(
            cmd_show(&config, false, "missing_1"),
            Err(PatternError::NotFound(_))
        ));
    }
}
