use colored::Colorize;
use std::path::Path;
use std::process::Command;

/// JavaScript tools whose versions are reported.
pub const TOOLS: &[&str] = &["node", "npm", "pnpm", "yarn", "bun"];

pub enum CheckResult {
    Ok(String),
    Missing(String),
}

/// First line of `<program> --version`, if the program runs and succeeds.
pub fn tool_version(program: &str) -> Option<String> {
    let output = Command::new(program).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
}

/// What kind of Solid project the current directory holds, if any.
pub fn project_language(dir: &Path) -> Option<&'static str> {
    if !dir.join("package.json").exists() {
        None
    } else if dir.join("tsconfig.json").exists() {
        Some("TypeScript")
    } else if dir.join("jsconfig.json").exists() {
        Some("JavaScript")
    } else {
        Some("unknown language")
    }
}

/// Print the CLI version, platform, project kind, and JavaScript toolchain.
///
/// Missing tools are reported, not treated as failures. Always returns `Ok(())`.
pub fn run() -> anyhow::Result<()> {
    println!("{}", "Solid CLI debug info".bold());
    println!();

    report(
        "solid",
        CheckResult::Ok(format!("v{}", env!("CARGO_PKG_VERSION"))),
    );
    report(
        "Platform",
        CheckResult::Ok(format!(
            "{} {}",
            std::env::consts::OS,
            std::env::consts::ARCH
        )),
    );
    report(
        "Project",
        match project_language(Path::new(".")) {
            Some(language) => CheckResult::Ok(language.to_string()),
            None => CheckResult::Missing("no package.json in the current directory".into()),
        },
    );

    println!();
    for tool in TOOLS {
        let result = match tool_version(tool) {
            Some(version) => CheckResult::Ok(version),
            None => CheckResult::Missing("not found".into()),
        };
        report(tool, result);
    }

    Ok(())
}

fn report(name: &str, result: CheckResult) {
    match &result {
        CheckResult::Ok(msg) => {
            println!("  {} {} {}", "✓".green(), name, msg.dimmed());
        }
        CheckResult::Missing(msg) => {
            println!("  {} {} {}", "!".yellow(), name, msg.yellow());
        }
    }
}
