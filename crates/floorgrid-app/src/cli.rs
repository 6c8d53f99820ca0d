//! Command line interface.

use crate::error::{AppError, AppResult};
use crate::files::{OutputDir, load_config, load_project};
use clap::{Args, Parser, Subcommand};
use floorgrid_core::{EdgeKind, ExportScope, FloorError, FloorKey, Project};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Floor-plan grid annotation tools
#[derive(Debug, Parser)]
#[command(name = "floorgrid", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write the navigation, POI and vertical-connection tables
    Export(ExportArgs),
    /// Print the validation report and per-floor summaries
    Check(CheckArgs),
    /// Print walkway edges and sharp corners of one floor
    Graph(GraphArgs),
}

impl Cli {
    pub fn execute(&self) -> AppResult<()> {
        match &self.command {
            Command::Export(args) => args.execute(),
            Command::Check(args) => args.execute(),
            Command::Graph(args) => args.execute(),
        }
    }
}

/// Export navigation data from a snapshot
#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Path to the project snapshot
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub out: PathBuf,

    /// Floors covered by the per-cell tables ("current" or "all")
    #[arg(long, default_value = "current")]
    pub scope: ExportScope,

    /// Optional JSON configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ExportArgs {
    pub fn execute(&self) -> AppResult<()> {
        let config = load_config(self.config.as_deref())?;
        let project = load_project(&self.snapshot, config)?;
        project.validation_report().log();

        let out = OutputDir::new(self.out.clone())?;
        let tables = project.export_tables(self.scope);
        let snapshot = project
            .to_json()
            .map_err(|e| AppError::Io(format!("Failed to serialize snapshot: {}", e)))?;
        for path in out.write_export(&tables, &snapshot)? {
            println!("{}", path.display());
        }
        Ok(())
    }
}

/// Validate a snapshot
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Path to the project snapshot
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Optional JSON configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl CheckArgs {
    pub fn execute(&self) -> AppResult<()> {
        let config = load_config(self.config.as_deref())?;
        let project = load_project(&self.snapshot, config)?;
        print!("{}", check_output(&project));
        Ok(())
    }
}

/// Per-floor summaries followed by the validation findings.
pub fn check_output(project: &Project) -> String {
    let mut out = String::new();
    for key in project.store.floor_keys() {
        let marker = if project.store.current_key() == Some(&key) { "*" } else { " " };
        if let Some(summary) = project.store.summary(&key) {
            let _ = writeln!(
                out,
                "{} {}: {} cells, {} painted, {} labeled",
                marker, key, summary.total_cells, summary.painted_cells, summary.labeled_cells
            );
        }
    }
    let report = project.validation_report();
    if report.is_clean() {
        out.push_str("No issues found\n");
    } else {
        for message in report.messages() {
            let _ = writeln!(out, "warning: {}", message);
        }
    }
    out
}

/// Inspect walkway connectivity
#[derive(Debug, Clone, Args)]
pub struct GraphArgs {
    /// Path to the project snapshot
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Floor key such as "0_Lobby" (defaults to the current floor)
    #[arg(long, value_name = "KEY", allow_hyphen_values = true)]
    pub floor: Option<FloorKey>,

    /// Optional JSON configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl GraphArgs {
    pub fn execute(&self) -> AppResult<()> {
        let config = load_config(self.config.as_deref())?;
        let project = load_project(&self.snapshot, config)?;
        print!("{}", graph_output(&project, self.floor.as_ref())?);
        Ok(())
    }
}

/// Edge list and sharp corners of a floor, one per line.
pub fn graph_output(project: &Project, floor: Option<&FloorKey>) -> AppResult<String> {
    let key = match floor {
        Some(key) => key,
        None => project.store.current_key().ok_or(FloorError::NoActiveFloor)?,
    };
    let conn = project
        .connectivity_for(key)
        .ok_or_else(|| FloorError::NotFound(key.clone()))?;

    let mut out = String::new();
    for edge in conn.graph() {
        let kind = match edge.kind {
            EdgeKind::Primary => "primary",
            EdgeKind::Secondary => "secondary",
        };
        let _ = writeln!(out, "{} -> {} {}", edge.from, edge.to, kind);
    }
    for cell in conn.sharp_corners() {
        let _ = writeln!(out, "sharp corner {}", cell);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorgrid_core::{CellKey, PaintMode, PoiCategory};
    use std::fs;
    use tempfile::TempDir;

    fn lobby_project() -> Project {
        let mut project = Project::new();
        project.store.create_floor("Lobby", 0).unwrap();
        let walkway = project.store.registry().walkway();
        for (r, c) in [(0, 0), (0, 1), (1, 1)] {
            project
                .store
                .paint_cell(CellKey::new(r, c), &walkway, PaintMode::Click)
                .unwrap();
        }
        project
    }

    fn write_snapshot(dir: &TempDir, project: &Project) -> PathBuf {
        let path = dir.path().join("project.json");
        fs::write(&path, project.to_json().unwrap()).unwrap();
        path
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["floorgrid", "export", "p.json", "--out", "out", "--scope", "all"]).unwrap();
        match cli.command {
            Command::Export(args) => {
                assert_eq!(args.scope, ExportScope::AllFloors);
                assert_eq!(args.out, PathBuf::from("out"));
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::try_parse_from(["floorgrid", "graph", "p.json", "--floor=-1_Basement"]).unwrap();
        match cli.command {
            Command::Graph(args) => {
                assert_eq!(args.floor, Some(FloorKey::new(-1, "Basement")));
                assert_eq!(args.config, None);
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::try_parse_from(["floorgrid", "graph", "p.json", "--config", "c.json"]).unwrap();
        match cli.command {
            Command::Graph(args) => assert_eq!(args.config, Some(PathBuf::from("c.json"))),
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["floorgrid", "export", "p.json", "--out", "o", "--scope", "some"]).is_err());
    }

    #[test]
    fn test_export_command_writes_tables() {
        let temp = TempDir::new().unwrap();
        let snapshot = write_snapshot(&temp, &lobby_project());
        let out = temp.path().join("out");
        let args = ExportArgs {
            snapshot,
            out: out.clone(),
            scope: ExportScope::CurrentFloor,
            config: None,
        };
        args.execute().unwrap();

        let navigation = fs::read_to_string(out.join("navigation.csv")).unwrap();
        assert_eq!(navigation.lines().count(), 4);
        assert!(navigation.lines().skip(1).all(|l| l.ends_with(",true,,")));
        assert!(out.join("poi.csv").is_file());
        assert!(out.join("vertical_connections.csv").is_file());
        assert!(out.join("snapshot.json").is_file());
    }

    #[test]
    fn test_export_rejects_malformed_snapshot() {
        let temp = TempDir::new().unwrap();
        let snapshot = temp.path().join("broken.json");
        fs::write(&snapshot, r#"{"version": 1}"#).unwrap();
        let out = temp.path().join("out");
        let args = ExportArgs {
            snapshot,
            out: out.clone(),
            scope: ExportScope::AllFloors,
            config: None,
        };
        assert!(matches!(args.execute(), Err(AppError::Import(_))));
        assert!(!out.exists());
    }

    #[test]
    fn test_check_output() {
        let mut project = lobby_project();
        let poi = project.store.registry().poi();
        project
            .store
            .paint_cell(CellKey::new(4, 4), &poi, PaintMode::Click)
            .unwrap();
        assert_eq!(
            check_output(&project),
            "* 0_Lobby: 4 cells, 4 painted, 0 labeled\nwarning: POI cell (4,4) on 0_Lobby has no category\n"
        );

        project
            .store
            .set_poi_category(CellKey::new(4, 4), PoiCategory::Atm)
            .unwrap();
        assert!(check_output(&project).ends_with("No issues found\n"));
    }

    #[test]
    fn test_graph_command_reads_config() {
        let temp = TempDir::new().unwrap();
        let snapshot = write_snapshot(&temp, &lobby_project());
        let config = temp.path().join("config.json");
        fs::write(&config, "max_zoom = 4").unwrap();
        let args = GraphArgs {
            snapshot: snapshot.clone(),
            floor: None,
            config: Some(config.clone()),
        };
        assert!(matches!(args.execute(), Err(AppError::Config(_))));

        fs::write(&config, r#"{ "max_zoom": 4.0 }"#).unwrap();
        let args = GraphArgs {
            snapshot,
            floor: None,
            config: Some(config),
        };
        args.execute().unwrap();
    }

    #[test]
    fn test_graph_output() {
        let project = lobby_project();
        assert_eq!(
            graph_output(&project, None).unwrap(),
            "0,0 -> 0,1 primary\n0,0 -> 1,1 secondary\n0,1 -> 1,1 primary\nsharp corner 0,1\n"
        );
        assert!(matches!(
            graph_output(&project, Some(&FloorKey::new(3, "Roof"))),
            Err(AppError::Floor(FloorError::NotFound(_)))
        ));
        assert!(matches!(
            graph_output(&Project::new(), None),
            Err(AppError::Floor(FloorError::NoActiveFloor))
        ));
    }
}
