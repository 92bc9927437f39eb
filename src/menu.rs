//! Interactive text menu, entered when redup runs without a subcommand.
//!
//! A thin outer surface over the pipeline: scan a directory, show the
//! duplicate summary, remove duplicates through the backup manager,
//! export results, print the version. All business logic stays in the
//! core components.

use std::io::{self, BufRead, Write};

use crate::backup::BackupManager;
use crate::config::Settings;
use crate::duplicates::{filter_duplicates, ContentGrouper, FileGroup};
use crate::output::{summary, CsvReport, JsonReport};
use crate::scanner::FileScanner;

/// Interactive menu session.
pub struct Menu {
    settings: Settings,
    duplicates: Vec<FileGroup>,
}

impl Menu {
    /// Create a menu over the given settings.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            duplicates: Vec::new(),
        }
    }

    /// Run the menu loop until the operator exits.
    pub fn run(&mut self) {
        loop {
            show_menu();
            match read_choice() {
                1 => self.scan_directory(),
                2 => self.show_summary(),
                3 => self.remove_duplicates(),
                4 => self.export_results(),
                5 => show_version(),
                6 => {
                    println!("Goodbye!");
                    return;
                }
                _ => println!("Invalid choice. Please try again."),
            }
            println!();
        }
    }

    fn scan_directory(&mut self) {
        print!("Enter directory path to scan [{}]: ", self.settings.root.display());
        let _ = io::stdout().flush();
        let input = read_line();
        if !input.is_empty() {
            self.settings.root = input.into();
        }

        println!("Scanning {}...", self.settings.root.display());

        let scanner = FileScanner::new(self.settings.min_size);
        let records = match scanner.scan(&self.settings.root) {
            Ok(records) => records,
            Err(e) => {
                println!("Error scanning directory: {e}");
                return;
            }
        };

        let grouper = ContentGrouper::new(self.settings.algorithm);
        let groups = match grouper.group(records) {
            Ok(groups) => groups,
            Err(e) => {
                println!("Error calculating checksums: {e}");
                return;
            }
        };

        self.duplicates = filter_duplicates(groups);
        println!("Found {} duplicate group(s).", self.duplicates.len());
    }

    fn show_summary(&self) {
        if self.duplicates.is_empty() {
            println!("No duplicates found. Please scan a directory first.");
            return;
        }
        let _ = summary::print_scan_summary(&self.duplicates, io::stdout());
    }

    fn remove_duplicates(&mut self) {
        if self.duplicates.is_empty() {
            println!("No duplicates found. Please scan a directory first.");
            return;
        }

        let mut policy = self.settings.policy();
        let mut manager = BackupManager::new(
            &self.settings.backup_dir,
            &self.settings.log_dir,
            policy.as_mut(),
        );

        match manager.process(&self.duplicates) {
            Ok(report) => {
                let _ = summary::print_backup_report(&report, io::stdout());
            }
            Err(e) => println!("Error processing duplicates: {e}"),
        }
    }

    fn export_results(&self) {
        if self.duplicates.is_empty() {
            println!("No duplicates found. Please scan a directory first.");
            return;
        }

        println!("Export format:");
        println!("[1] JSON");
        println!("[2] CSV");

        match read_choice() {
            1 => {
                if let Err(e) = JsonReport::new(&self.duplicates).write_to(io::stdout()) {
                    println!("Error exporting JSON: {e}");
                }
            }
            2 => {
                if let Err(e) = CsvReport::new(&self.duplicates).write_to(io::stdout()) {
                    println!("Error exporting CSV: {e}");
                }
            }
            _ => println!("Invalid choice."),
        }
    }
}

fn show_menu() {
    println!("redup — Duplicate File Manager");
    println!("[1] Scan directory");
    println!("[2] Show duplicate summary");
    println!("[3] Remove duplicates");
    println!("[4] Export results (JSON/CSV)");
    println!("[5] Show version");
    println!("[6] Exit");
}

fn show_version() {
    println!("redup version {}", env!("CARGO_PKG_VERSION"));
}

fn read_choice() -> u32 {
    print!("Choice: ");
    let _ = io::stdout().flush();
    read_line().parse().unwrap_or(0)
}

fn read_line() -> String {
    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_string()
}
