use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use fiscal_mover::{
    normalize, os_str_to_string, path_to_file_extension_string, path_to_filename_string, path_to_string, print_error,
    print_warning,
};

use crate::Args;
use crate::config::Config;
use crate::locate;
use crate::matching;
use crate::types::{BucketSearch, MatchResult, MoveOutcome, Proposal, ProposalStatus, TargetKind};

#[derive(Debug)]
pub struct Mover {
    source_root: PathBuf,
    dest_root: PathBuf,
    config: Config,
}

impl Mover {
    pub fn new(args: Args) -> Result<Self> {
        let config = Config::from_args(args);
        let source_root = fiscal_mover::resolve_input_path(config.source.as_deref())?;
        let dest_root = config
            .dest
            .clone()
            .context("Destination root must be given with --dest or in the config file")?;
        if !dest_root.is_dir() {
            anyhow::bail!("Destination root is not a directory: '{}'", dest_root.display());
        }
        if config.debug {
            eprintln!("Config: {config:#?}");
            eprintln!("Source: {}", source_root.display());
            eprintln!("Destination: {}", dest_root.display());
        }
        Ok(Self {
            source_root,
            dest_root,
            config,
        })
    }

    pub fn run(&self) -> Result<()> {
        let mut proposals = self.scan()?;

        println!(
            "{}",
            format!("Found {} company folder(s) to process:", proposals.len()).bold()
        );
        for proposal in &proposals {
            let marker = if matches!(proposal.status, ProposalStatus::Ready { .. }) {
                "+".green()
            } else {
                "-".red()
            };
            println!("{marker} {}", proposal.company.cyan().bold());
            println!("    {}", proposal.describe());
        }
        println!();

        if self.config.dryrun {
            return self.print_plan(&proposals);
        }

        if !self.config.auto {
            self.prompt_approvals(&mut proposals)?;
        }

        let mut moved = 0;
        let mut skipped = 0;
        let mut failed = 0;
        for proposal in proposals.iter().filter(|proposal| proposal.approved) {
            println!("{}", proposal.company.cyan().bold());
            match self.execute(proposal) {
                Ok(outcomes) => {
                    for outcome in &outcomes {
                        match outcome {
                            MoveOutcome::Moved { .. } => moved += 1,
                            MoveOutcome::SkippedExisting { .. } => skipped += 1,
                            MoveOutcome::Failed { .. } => failed += 1,
                            _ => {}
                        }
                    }
                }
                Err(e) => {
                    failed += 1;
                    print_error!("Failed to process '{}': {e}", proposal.company);
                }
            }
            println!();
        }

        println!(
            "{}",
            format!("Done: {moved} moved, {skipped} skipped, {failed} failed").bold()
        );
        Ok(())
    }

    /// Build one proposal per company folder from a snapshot of both roots.
    fn scan(&self) -> Result<Vec<Proposal>> {
        let companies = collect_directory_names(&self.source_root)?;
        if companies.is_empty() {
            anyhow::bail!(
                "No company folders found in source root: '{}'",
                self.source_root.display()
            );
        }
        let dest_folders = collect_directory_names(&self.dest_root)?;
        let generic = self.config.generic_word_set();
        let default_kind = if self.config.subfolder_mode {
            TargetKind::Subfolders
        } else {
            TargetKind::Documents
        };

        Ok(companies
            .into_iter()
            .map(|company| self.build_proposal(company, &dest_folders, &generic, default_kind))
            .collect())
    }

    fn build_proposal(
        &self,
        company: String,
        dest_folders: &[String],
        generic: &std::collections::BTreeSet<String>,
        default_kind: TargetKind,
    ) -> Proposal {
        let source_path = self.source_root.join(&company);
        let status = match matching::resolve_destination(&company, dest_folders, generic) {
            MatchResult::Unmatched => ProposalStatus::NoMatch,
            MatchResult::Matched { folder, score } => {
                if self.config.verbose {
                    println!("Matched '{company}' to '{folder}' with score {score}");
                }
                let dest_folder = self.dest_root.join(&folder);
                match locate::find_dated_bucket(
                    &dest_folder,
                    &self.config.bucket_label,
                    &self.config.year_marker,
                    &self.config.month_marker,
                ) {
                    BucketSearch::Found(primary_target) => {
                        let alternate_target = locate::derive_alternate(
                            &primary_target,
                            &self.config.bucket_label,
                            &self.config.alternate_label,
                        );
                        ProposalStatus::Ready {
                            dest_folder,
                            primary_target,
                            alternate_target,
                        }
                    }
                    BucketSearch::NotFound => ProposalStatus::NoBucket { dest_folder },
                    BucketSearch::Ambiguous(candidates) => ProposalStatus::AmbiguousBucket {
                        dest_folder,
                        candidates,
                    },
                }
            }
        };
        let approved = matches!(status, ProposalStatus::Ready { .. });
        Proposal {
            company,
            source_path,
            status,
            target_kind: default_kind,
            approved,
        }
    }

    /// Ask for confirmation per ready proposal.
    /// Accepts a target-kind change or a bulk approval for the remaining rows.
    fn prompt_approvals(&self, proposals: &mut [Proposal]) -> Result<()> {
        let mut approve_rest = false;
        for proposal in proposals.iter_mut() {
            if !matches!(proposal.status, ProposalStatus::Ready { .. }) {
                proposal.approved = false;
                continue;
            }
            if approve_rest {
                proposal.approved = true;
                continue;
            }

            println!("{}", proposal.company.cyan().bold());
            println!("  {} {}", "→".green(), proposal.describe());
            print!(
                "{}",
                "Move? (y)es / (n)o / (d)ocuments / (s)ubfolders / (a)ll: ".magenta()
            );
            std::io::stdout().flush()?;

            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;
            match input.trim().to_lowercase().as_str() {
                "y" | "yes" => proposal.approved = true,
                "d" => {
                    proposal.target_kind = TargetKind::Documents;
                    proposal.approved = true;
                }
                "s" => {
                    proposal.target_kind = TargetKind::Subfolders;
                    proposal.approved = true;
                }
                "a" => {
                    proposal.approved = true;
                    approve_rest = true;
                }
                _ => {
                    proposal.approved = false;
                    println!("  Skipped");
                }
            }
        }
        Ok(())
    }

    /// Print what would be moved without touching anything.
    fn print_plan(&self, proposals: &[Proposal]) -> Result<()> {
        for proposal in proposals.iter().filter(|proposal| proposal.approved) {
            let Some(target) = proposal.target_path() else {
                continue;
            };
            let candidates = self.plan(proposal)?;
            println!("{}: {} entries", proposal.company.cyan().bold(), candidates.len());
            for candidate in &candidates {
                println!("  {}", path_to_filename_string(candidate));
            }
            println!("  {} Move to: {}", "→".green(), path_to_string(target));
        }
        Ok(())
    }

    /// Collect the move candidates for one approved proposal.
    fn plan(&self, proposal: &Proposal) -> Result<Vec<PathBuf>> {
        match proposal.target_kind {
            TargetKind::Documents => self.plan_documents(&proposal.source_path),
            TargetKind::Subfolders => self.plan_subfolders(&proposal.source_path),
        }
    }

    /// Direct child files whose extension is in the allow-list.
    /// Subdirectories are ignored.
    fn plan_documents(&self, source: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(source)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let extension = path_to_file_extension_string(&entry.path());
                if self.config.extensions.iter().any(|allowed| *allowed == extension) {
                    files.push(entry.path());
                }
            }
        }
        files.sort();
        Ok(files)
    }

    /// Direct child directories whose normalized name is one of the
    /// inbound/outbound labels. Files are ignored.
    fn plan_subfolders(&self, source: &Path) -> Result<Vec<PathBuf>> {
        let labels = self.config.subfolder_label_set();
        let mut dirs = Vec::new();
        for entry in fs::read_dir(source)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() && labels.contains(&normalize(&os_str_to_string(&entry.file_name()))) {
                dirs.push(entry.path());
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    /// Run the move for one approved proposal and clean up the source folder
    /// when anything was relocated.
    fn execute(&self, proposal: &Proposal) -> Result<Vec<MoveOutcome>> {
        let Some(target) = proposal.target_path() else {
            return Ok(Vec::new());
        };
        let candidates = self.plan(proposal)?;
        if candidates.is_empty() {
            print_warning!("Nothing to move for '{}'", proposal.company);
            return Ok(vec![MoveOutcome::SourceKept {
                path: proposal.source_path.clone(),
            }]);
        }

        if !target.exists() {
            fs::create_dir_all(target)
                .with_context(|| format!("Failed to create target directory: '{}'", target.display()))?;
            println!("  Created directory: {}", path_to_string(target));
        }

        let mut outcomes = match proposal.target_kind {
            TargetKind::Documents => self.execute_documents(&candidates, target),
            TargetKind::Subfolders => self.execute_subfolders(&candidates, target),
        };

        if outcomes.iter().any(MoveOutcome::is_move) {
            match fs::remove_dir_all(&proposal.source_path) {
                Ok(()) => {
                    println!("  Removed source folder: {}", path_to_string(&proposal.source_path));
                    outcomes.push(MoveOutcome::SourceRemoved {
                        path: proposal.source_path.clone(),
                    });
                }
                Err(e) => {
                    print_error!("Failed to remove source folder {}: {e}", proposal.source_path.display());
                    outcomes.push(MoveOutcome::Failed {
                        path: proposal.source_path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        } else {
            print_warning!("Nothing moved, keeping source folder: {}", proposal.source_path.display());
            outcomes.push(MoveOutcome::SourceKept {
                path: proposal.source_path.clone(),
            });
        }

        Ok(outcomes)
    }

    /// Move document files one by one.
    /// Existing destination files are never overwritten, and one failed move
    /// never aborts the rest of the batch.
    fn execute_documents(&self, candidates: &[PathBuf], target: &Path) -> Vec<MoveOutcome> {
        let mut outcomes = Vec::with_capacity(candidates.len());
        for file in candidates {
            let name = path_to_filename_string(file);
            let destination = target.join(&name);
            if destination.exists() {
                print_warning!("Skipping {name}: already exists at destination");
                outcomes.push(MoveOutcome::SkippedExisting { path: destination });
                continue;
            }
            match move_entry(file, &destination) {
                Ok(()) => {
                    if self.config.verbose {
                        println!("  Moved: {name}");
                    }
                    outcomes.push(MoveOutcome::Moved {
                        from: file.clone(),
                        to: destination,
                    });
                }
                Err(e) => {
                    print_error!("Failed to move {name}: {e}");
                    outcomes.push(MoveOutcome::Failed {
                        path: file.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        outcomes
    }

    /// Move whole subfolders, replacing matching pre-existing entries
    /// (including plural spelling variants) at the destination first.
    fn execute_subfolders(&self, candidates: &[PathBuf], target: &Path) -> Vec<MoveOutcome> {
        let mut outcomes = Vec::new();
        let variants = self.config.subfolder_variant_set();

        match fs::read_dir(target) {
            Ok(entries) => {
                for entry in entries.filter_map(std::result::Result::ok) {
                    let name = os_str_to_string(&entry.file_name());
                    if entry.path().is_dir() && variants.contains(&normalize(&name)) {
                        match fs::remove_dir_all(entry.path()) {
                            Ok(()) => {
                                println!("  Replaced existing: {name}");
                                outcomes.push(MoveOutcome::Replaced { path: entry.path() });
                            }
                            Err(e) => {
                                print_error!("Failed to remove existing {name}: {e}");
                                outcomes.push(MoveOutcome::Failed {
                                    path: entry.path(),
                                    error: e.to_string(),
                                });
                            }
                        }
                    }
                }
            }
            Err(e) => {
                print_error!("Failed to list destination {}: {e}", target.display());
                outcomes.push(MoveOutcome::Failed {
                    path: target.to_path_buf(),
                    error: e.to_string(),
                });
            }
        }

        for dir in candidates {
            let name = path_to_filename_string(dir);
            let destination = target.join(&name);
            match move_entry(dir, &destination) {
                Ok(()) => {
                    if self.config.verbose {
                        println!("  Moved: {name}");
                    }
                    outcomes.push(MoveOutcome::Moved {
                        from: dir.clone(),
                        to: destination,
                    });
                }
                Err(e) => {
                    print_error!("Failed to move {name}: {e}");
                    outcomes.push(MoveOutcome::Failed {
                        path: dir.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        outcomes
    }
}

/// List the direct child directory names of a root, lexicographically sorted.
/// Hidden entries are skipped.
fn collect_directory_names(root: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("Failed to list directory: '{}'", root.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            let name = os_str_to_string(&entry.file_name());
            if !name.starts_with('.') {
                names.push(name);
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Move a filesystem entry to a new parent.
/// Tries a plain rename first and falls back to copy and delete,
/// since the destination is typically on a different filesystem.
fn move_entry(from: &Path, to: &Path) -> std::io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_error) => {
            if from.is_file() {
                fs::copy(from, to)?;
                fs::remove_file(from)
            } else if from.is_dir() {
                copy_dir_recursive(from, to)?;
                fs::remove_dir_all(from)
            } else {
                Err(rename_error)
            }
        }
    }
}

fn copy_dir_recursive(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let destination = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &destination)?;
        } else {
            fs::copy(entry.path(), &destination)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod mover_tests {
    use super::*;

    use std::fs::File;

    use tempfile::{TempDir, tempdir};

    fn test_config() -> Config {
        Config {
            source: None,
            dest: None,
            auto: true,
            debug: false,
            dryrun: false,
            verbose: false,
            extensions: ["pdf", "xml", "txt", "xlsx", "xls"].iter().map(ToString::to_string).collect(),
            generic_words: ["LTDA", "SA", "ME", "EPP", "EIRELI", "CIA"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            bucket_label: "PRESTADOS".to_string(),
            alternate_label: "TOMADOS".to_string(),
            subfolder_labels: ["ENTRADA", "SAIDA"].iter().map(ToString::to_string).collect(),
            year_marker: "2025".to_string(),
            month_marker: "03-2025".to_string(),
            subfolder_mode: false,
        }
    }

    fn test_mover(source: &Path, dest: &Path) -> Mover {
        Mover {
            source_root: source.to_path_buf(),
            dest_root: dest.to_path_buf(),
            config: test_config(),
        }
    }

    fn make_roots() -> (TempDir, TempDir) {
        (
            tempdir().expect("should create source dir"),
            tempdir().expect("should create dest dir"),
        )
    }

    fn touch(path: &Path) {
        File::create(path).expect("should create file");
    }

    fn ready_proposal(mover: &Mover, company: &str, target: &Path, kind: TargetKind) -> Proposal {
        Proposal {
            company: company.to_string(),
            source_path: mover.source_root.join(company),
            status: ProposalStatus::Ready {
                dest_folder: mover.dest_root.join(company),
                primary_target: target.to_path_buf(),
                alternate_target: target.with_file_name("TOMADOS"),
            },
            target_kind: kind,
            approved: true,
        }
    }

    #[test]
    fn test_plan_documents_filters_extensions() {
        let (source, dest) = make_roots();
        let company = source.path().join("ACME LTDA");
        fs::create_dir(&company).expect("should create dir");
        touch(&company.join("invoice.pdf"));
        touch(&company.join("report.XML"));
        touch(&company.join("notes.docx"));
        fs::create_dir(company.join("nested")).expect("should create dir");
        touch(&company.join("nested").join("inner.pdf"));

        let mover = test_mover(source.path(), dest.path());
        let files = mover.plan_documents(&company).expect("should plan");
        let names: Vec<String> = files.iter().map(|f| path_to_filename_string(f)).collect();

        // Extension match is case-insensitive, subdirectories are ignored.
        assert_eq!(names, vec!["invoice.pdf", "report.XML"]);
    }

    #[test]
    fn test_plan_subfolders_matches_normalized_labels() {
        let (source, dest) = make_roots();
        let company = source.path().join("ACME LTDA");
        fs::create_dir(&company).expect("should create dir");
        fs::create_dir(company.join("Entrada")).expect("should create dir");
        fs::create_dir(company.join("SAÍDA")).expect("should create dir");
        fs::create_dir(company.join("OUTROS")).expect("should create dir");
        touch(&company.join("ENTRADA.pdf"));

        let mover = test_mover(source.path(), dest.path());
        let dirs = mover.plan_subfolders(&company).expect("should plan");
        let names: Vec<String> = dirs.iter().map(|d| path_to_filename_string(d)).collect();

        assert_eq!(names, vec!["Entrada", "SAÍDA"]);
    }

    #[test]
    fn test_execute_documents_collision_skips_and_keeps_source() {
        let (source, dest) = make_roots();
        let company = source.path().join("ACME LTDA");
        fs::create_dir(&company).expect("should create dir");
        let source_file = company.join("invoice.pdf");
        fs::write(&source_file, b"new").expect("should write");
        fs::write(dest.path().join("invoice.pdf"), b"old").expect("should write");

        let mover = test_mover(source.path(), dest.path());
        let outcomes = mover.execute_documents(&[source_file.clone()], dest.path());

        assert_eq!(
            outcomes,
            vec![MoveOutcome::SkippedExisting {
                path: dest.path().join("invoice.pdf"),
            }]
        );
        // Source untouched, destination content preserved.
        assert!(source_file.exists());
        assert_eq!(fs::read(dest.path().join("invoice.pdf")).expect("should read"), b"old");
    }

    #[test]
    fn test_execute_documents_moves_file() {
        let (source, dest) = make_roots();
        let company = source.path().join("ACME LTDA");
        fs::create_dir(&company).expect("should create dir");
        let source_file = company.join("invoice.pdf");
        fs::write(&source_file, b"content").expect("should write");

        let mover = test_mover(source.path(), dest.path());
        let outcomes = mover.execute_documents(&[source_file.clone()], dest.path());

        assert_eq!(
            outcomes,
            vec![MoveOutcome::Moved {
                from: source_file.clone(),
                to: dest.path().join("invoice.pdf"),
            }]
        );
        assert!(!source_file.exists());
        assert_eq!(fs::read(dest.path().join("invoice.pdf")).expect("should read"), b"content");
    }

    #[test]
    fn test_execute_documents_failure_does_not_abort_batch() {
        let (source, dest) = make_roots();
        let company = source.path().join("ACME LTDA");
        fs::create_dir(&company).expect("should create dir");
        let gone = company.join("a_gone.pdf");
        let invoice = company.join("b_invoice.pdf");
        fs::write(&gone, b"gone").expect("should write");
        fs::write(&invoice, b"content").expect("should write");

        let mover = test_mover(source.path(), dest.path());
        let candidates = mover.plan_documents(&company).expect("should plan");
        assert_eq!(candidates, vec![gone.clone(), invoice.clone()]);

        // First candidate disappears between planning and execution.
        fs::remove_file(&gone).expect("should remove");
        let outcomes = mover.execute_documents(&candidates, dest.path());

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(&outcomes[0], MoveOutcome::Failed { path, .. } if *path == gone));
        assert_eq!(
            outcomes[1],
            MoveOutcome::Moved {
                from: invoice,
                to: dest.path().join("b_invoice.pdf"),
            }
        );
        assert_eq!(
            fs::read(dest.path().join("b_invoice.pdf")).expect("should read"),
            b"content"
        );
    }

    #[test]
    fn test_execute_subfolders_failure_does_not_abort_batch() {
        let (source, dest) = make_roots();
        let company = source.path().join("ACME LTDA");
        let entrada = company.join("ENTRADA");
        let saida = company.join("SAIDA");
        fs::create_dir_all(&entrada).expect("should create dirs");
        fs::create_dir_all(&saida).expect("should create dirs");
        fs::write(saida.join("nota.xml"), b"xml").expect("should write");

        let mover = test_mover(source.path(), dest.path());
        let candidates = mover.plan_subfolders(&company).expect("should plan");
        assert_eq!(candidates, vec![entrada.clone(), saida.clone()]);

        // First candidate disappears between planning and execution.
        fs::remove_dir_all(&entrada).expect("should remove");
        let outcomes = mover.execute_subfolders(&candidates, dest.path());

        assert!(matches!(&outcomes[0], MoveOutcome::Failed { path, .. } if *path == entrada));
        assert!(outcomes.contains(&MoveOutcome::Moved {
            from: saida,
            to: dest.path().join("SAIDA"),
        }));
        assert!(dest.path().join("SAIDA").join("nota.xml").exists());
    }

    #[test]
    fn test_execute_subfolders_replaces_plural_variant() {
        let (source, dest) = make_roots();
        let company = source.path().join("ACME LTDA");
        let entrada = company.join("Entrada");
        fs::create_dir_all(&entrada).expect("should create dirs");
        fs::write(entrada.join("nota.xml"), b"xml").expect("should write");

        // Pre-existing plural variant at the destination with stale content.
        let stale = dest.path().join("ENTRADAS");
        fs::create_dir(&stale).expect("should create dir");
        fs::write(stale.join("stale.xml"), b"old").expect("should write");

        let mover = test_mover(source.path(), dest.path());
        let outcomes = mover.execute_subfolders(&[entrada.clone()], dest.path());

        assert!(outcomes.contains(&MoveOutcome::Replaced { path: stale.clone() }));
        assert!(outcomes.contains(&MoveOutcome::Moved {
            from: entrada.clone(),
            to: dest.path().join("Entrada"),
        }));
        // Plural variant is gone, only the moved folder remains with its contents.
        assert!(!stale.exists());
        assert!(!entrada.exists());
        assert!(dest.path().join("Entrada").join("nota.xml").exists());
    }

    #[test]
    fn test_execute_subfolders_keeps_unrelated_destination_entries() {
        let (source, dest) = make_roots();
        let company = source.path().join("ACME LTDA");
        let saida = company.join("SAIDA");
        fs::create_dir_all(&saida).expect("should create dirs");
        let unrelated = dest.path().join("RELATORIOS");
        fs::create_dir(&unrelated).expect("should create dir");

        let mover = test_mover(source.path(), dest.path());
        let outcomes = mover.execute_subfolders(&[saida], dest.path());

        assert!(unrelated.exists());
        assert!(!outcomes.iter().any(|o| matches!(o, MoveOutcome::Replaced { .. })));
    }

    #[test]
    fn test_execute_removes_source_after_successful_move() {
        let (source, dest) = make_roots();
        let company = source.path().join("ACME LTDA");
        fs::create_dir(&company).expect("should create dir");
        fs::write(company.join("invoice.pdf"), b"content").expect("should write");
        fs::write(company.join("notes.docx"), b"ignored").expect("should write");
        let target = dest.path().join("PRESTADOS");
        fs::create_dir(&target).expect("should create dir");

        let mover = test_mover(source.path(), dest.path());
        let proposal = ready_proposal(&mover, "ACME LTDA", &target, TargetKind::Documents);
        let outcomes = mover.execute(&proposal).expect("should execute");

        assert!(outcomes.iter().any(MoveOutcome::is_move));
        assert!(outcomes.contains(&MoveOutcome::SourceRemoved { path: company.clone() }));
        assert!(!company.exists());
        assert!(target.join("invoice.pdf").exists());
    }

    #[test]
    fn test_execute_keeps_source_when_nothing_qualifies() {
        let (source, dest) = make_roots();
        let company = source.path().join("ACME LTDA");
        fs::create_dir(&company).expect("should create dir");
        fs::write(company.join("notes.docx"), b"ignored").expect("should write");
        let target = dest.path().join("PRESTADOS");
        fs::create_dir(&target).expect("should create dir");

        let mover = test_mover(source.path(), dest.path());
        let proposal = ready_proposal(&mover, "ACME LTDA", &target, TargetKind::Documents);
        let outcomes = mover.execute(&proposal).expect("should execute");

        assert_eq!(outcomes, vec![MoveOutcome::SourceKept { path: company.clone() }]);
        assert!(company.exists());
        assert!(company.join("notes.docx").exists());
    }

    #[test]
    fn test_execute_keeps_source_when_all_moves_skip() {
        let (source, dest) = make_roots();
        let company = source.path().join("ACME LTDA");
        fs::create_dir(&company).expect("should create dir");
        fs::write(company.join("invoice.pdf"), b"new").expect("should write");
        let target = dest.path().join("PRESTADOS");
        fs::create_dir(&target).expect("should create dir");
        fs::write(target.join("invoice.pdf"), b"old").expect("should write");

        let mover = test_mover(source.path(), dest.path());
        let proposal = ready_proposal(&mover, "ACME LTDA", &target, TargetKind::Documents);
        let outcomes = mover.execute(&proposal).expect("should execute");

        assert!(outcomes.contains(&MoveOutcome::SourceKept { path: company.clone() }));
        assert!(company.join("invoice.pdf").exists());
    }

    #[test]
    fn test_scan_empty_source_is_fatal() {
        let (source, dest) = make_roots();
        let mover = test_mover(source.path(), dest.path());
        let result = mover.scan();
        assert!(result.is_err());
    }

    #[test]
    fn test_scan_unmatched_company_is_unapproved() {
        let (source, dest) = make_roots();
        fs::create_dir(source.path().join("EMPRESA DESCONHECIDA")).expect("should create dir");
        fs::create_dir(dest.path().join("OUTRA COISA")).expect("should create dir");

        let mover = test_mover(source.path(), dest.path());
        let proposals = mover.scan().expect("should scan");

        assert_eq!(proposals.len(), 1);
        assert!(!proposals[0].approved);
        assert!(matches!(proposals[0].status, ProposalStatus::NoMatch));
    }

    #[test]
    fn test_scan_matched_without_bucket_is_unapproved() {
        let (source, dest) = make_roots();
        fs::create_dir(source.path().join("ACME SERVICOS LTDA")).expect("should create dir");
        fs::create_dir(dest.path().join("ACME LTDA")).expect("should create dir");

        let mover = test_mover(source.path(), dest.path());
        let proposals = mover.scan().expect("should scan");

        assert_eq!(proposals.len(), 1);
        assert!(!proposals[0].approved);
        assert!(matches!(proposals[0].status, ProposalStatus::NoBucket { .. }));
    }

    #[test]
    fn test_move_entry_plain_file() {
        let dir = tempdir().expect("should create temp dir");
        let from = dir.path().join("a.txt");
        let to = dir.path().join("b.txt");
        fs::write(&from, b"data").expect("should write");

        move_entry(&from, &to).expect("should move");
        assert!(!from.exists());
        assert_eq!(fs::read(&to).expect("should read"), b"data");
    }

    #[test]
    fn test_move_entry_missing_source_fails() {
        let dir = tempdir().expect("should create temp dir");
        let result = move_entry(&dir.path().join("missing"), &dir.path().join("target"));
        assert!(result.is_err());
    }

    #[test]
    fn test_copy_dir_recursive() {
        let dir = tempdir().expect("should create temp dir");
        let from = dir.path().join("tree");
        fs::create_dir_all(from.join("inner")).expect("should create dirs");
        fs::write(from.join("top.txt"), b"top").expect("should write");
        fs::write(from.join("inner").join("deep.txt"), b"deep").expect("should write");

        let to = dir.path().join("copy");
        copy_dir_recursive(&from, &to).expect("should copy");

        assert_eq!(fs::read(to.join("top.txt")).expect("should read"), b"top");
        assert_eq!(fs::read(to.join("inner").join("deep.txt")).expect("should read"), b"deep");
    }

    #[test]
    fn test_end_to_end_acme_scenario() {
        let (source, dest) = make_roots();

        // Source company folder with one allow-listed and one excluded file.
        let company = source.path().join("ACME SERVICOS LTDA");
        fs::create_dir(&company).expect("should create dir");
        fs::write(company.join("invoice.pdf"), b"invoice").expect("should write");
        fs::write(company.join("notes.docx"), b"notes").expect("should write");

        // Destination folder with an empty dated bucket.
        let bucket = dest.path().join("ACME LTDA").join("2025").join("03-2025").join("PRESTADOS");
        fs::create_dir_all(&bucket).expect("should create dirs");

        let mover = test_mover(source.path(), dest.path());
        let proposals = mover.scan().expect("should scan");

        assert_eq!(proposals.len(), 1);
        let proposal = &proposals[0];
        assert!(proposal.approved);
        assert_eq!(proposal.target_path(), Some(bucket.as_path()));

        let outcomes = mover.execute(proposal).expect("should execute");

        // Only the pdf moved, and the source folder is gone since something moved.
        assert!(bucket.join("invoice.pdf").exists());
        assert!(!bucket.join("notes.docx").exists());
        assert!(!company.exists());
        assert_eq!(outcomes.iter().filter(|o| o.is_move()).count(), 1);
        assert!(outcomes.contains(&MoveOutcome::SourceRemoved { path: company.clone() }));
    }
}
