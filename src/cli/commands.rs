use crate::config::{CoercionPolicy, ExcelConfig};
use crate::excel::{ExcelUtil, ImportOutcome};
use crate::models::{Dept, User};
use crate::record::SheetRecord;
use crate::types::ColumnDescriptor;
use anyhow::{bail, Context};
use clap::ValueEnum;
use colored::Colorize;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Record types the CLI knows how to map
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordKind {
    Dept,
    User,
}

/// Settings shared by every command
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    pub config: Option<PathBuf>,
    pub download_dir: Option<PathBuf>,
    pub strict: bool,
    pub verbose: bool,
}

impl CommandOptions {
    /// Config file (if any), then command-line overrides
    pub fn load_config(&self) -> anyhow::Result<ExcelConfig> {
        let mut config = match &self.config {
            Some(path) => ExcelConfig::from_yaml_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ExcelConfig::default(),
        };
        if let Some(dir) = &self.download_dir {
            config.download_path = dir.clone();
        }
        if self.strict {
            config.coercion_policy = CoercionPolicy::Abort;
        }
        Ok(config)
    }
}

/// Execute the import command
pub fn import(
    input: PathBuf,
    kind: RecordKind,
    sheet: Option<String>,
    output: Option<PathBuf>,
    options: &CommandOptions,
) -> anyhow::Result<()> {
    let (sheet, output) = (sheet.as_deref(), output.as_deref());
    match kind {
        RecordKind::Dept => import_records::<Dept>(&input, sheet, output, options),
        RecordKind::User => import_records::<User>(&input, sheet, output, options),
    }
}

/// Execute the export command
pub fn export(
    input: PathBuf,
    kind: RecordKind,
    sheet: String,
    options: &CommandOptions,
) -> anyhow::Result<()> {
    match kind {
        RecordKind::Dept => export_records::<Dept>(&input, &sheet, options),
        RecordKind::User => export_records::<User>(&input, &sheet, options),
    }
}

/// Execute the template command: headers, dropdowns and prompts only
pub fn template(kind: RecordKind, sheet: String, options: &CommandOptions) -> anyhow::Result<()> {
    println!("{}", "📄 SheetBind - Import Template".bold().green());
    let filename = match kind {
        RecordKind::Dept => write_template::<Dept>(&sheet, options)?,
        RecordKind::User => write_template::<User>(&sheet, options)?,
    };
    println!("{}", "✅ Template written".bold().green());
    println!("   File: {}\n", filename);
    Ok(())
}

/// Execute the columns command
pub fn columns(kind: RecordKind) -> anyhow::Result<()> {
    let columns = match kind {
        RecordKind::Dept => ExcelUtil::<Dept>::new()?.columns().to_vec(),
        RecordKind::User => ExcelUtil::<User>::new()?.columns().to_vec(),
    };

    println!("{}", "📋 SheetBind - Column Map".bold().green());
    println!();
    for column in &columns {
        println!("{}", describe_column(column));
    }
    println!();
    Ok(())
}

fn import_records<T>(
    input: &Path,
    sheet: Option<&str>,
    output: Option<&Path>,
    options: &CommandOptions,
) -> anyhow::Result<()>
where
    T: SheetRecord + Serialize,
{
    println!("{}", "📥 SheetBind - Excel Import".bold().green());
    println!("   Input: {}", input.display());
    if let Some(name) = sheet {
        println!("   Sheet: {}", name.bright_yellow());
    }
    println!();

    let util = ExcelUtil::<T>::with_config(options.load_config()?)?;
    let outcome = util
        .import_excel_file(input, sheet)
        .with_context(|| format!("Failed to import {}", input.display()))?;

    print_outcome(&outcome, options.verbose);

    let json = serde_json::to_string_pretty(&outcome.records)?;
    match output {
        Some(path) => {
            fs::write(path, json)?;
            println!("   JSON file: {}\n", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn export_records<T>(input: &Path, sheet: &str, options: &CommandOptions) -> anyhow::Result<()>
where
    T: SheetRecord + DeserializeOwned,
{
    println!("{}", "📤 SheetBind - Excel Export".bold().green());
    println!("   Input: {}", input.display());
    println!("   Sheet: {}\n", sheet);

    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let records: Vec<T> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of records", input.display()))?;

    if options.verbose {
        println!("   Found {} records\n", records.len());
    }

    let config = options.load_config()?;
    let download_path = config.download_path.clone();
    let result = ExcelUtil::<T>::with_config(config)?.export_excel(&records, sheet);

    match result.data {
        Some(filename) if result.success => {
            println!("{}", "✅ Export Complete!".bold().green());
            println!("   Excel file: {}\n", download_path.join(&filename).display());
            println!("{}", filename);
            Ok(())
        }
        _ => bail!(result.msg),
    }
}

fn write_template<T: SheetRecord>(sheet: &str, options: &CommandOptions) -> anyhow::Result<String> {
    let config = options.load_config()?;
    let download_path = config.download_path.clone();
    let result = ExcelUtil::<T>::with_config(config)?.import_template_excel(sheet);

    match result.data {
        Some(filename) if result.success => Ok(download_path.join(filename).display().to_string()),
        _ => bail!(result.msg),
    }
}

fn print_outcome<T>(outcome: &ImportOutcome<T>, verbose: bool) {
    println!(
        "{} {} records from sheet '{}'",
        "✅".green(),
        outcome.records.len(),
        outcome.sheet
    );
    if outcome.blank_rows > 0 && verbose {
        println!("   {} blank rows skipped", outcome.blank_rows);
    }
    if !outcome.is_clean() {
        println!(
            "{}",
            format!("⚠️  {} rows skipped with errors:", outcome.failed_rows)
                .bold()
                .yellow()
        );
        for diagnostic in &outcome.diagnostics {
            println!("   {}", diagnostic.to_string().yellow());
        }
    }
    println!();
}

/// One line of the column map
pub fn describe_column(column: &ColumnDescriptor) -> String {
    let mut flags: Vec<String> = Vec::new();
    if !column.is_exportable {
        flags.push("import-only".to_string());
    }
    if let Some(pattern) = &column.date_format {
        flags.push(format!("date={}", pattern));
    }
    if let Some(exp) = &column.translation_expr {
        flags.push(format!("exp={}", exp));
    }
    if let Some(path) = &column.nested_path {
        flags.push(format!("path={}", path));
    }
    if let Some(options) = &column.pick_list {
        flags.push(format!("combo={}", options.join("|")));
    }

    format!(
        "{:>3}  {:<12} {:<10} {}{}",
        column.ordinal,
        column.field,
        column.kind.type_name(),
        column.display_name,
        if flags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", flags.join(", "))
        }
    )
}
