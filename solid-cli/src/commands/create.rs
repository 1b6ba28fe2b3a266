use anyhow::bail;
use colored::Colorize;
use std::path::{Path, PathBuf};

use solid_create::convert::convert_to_js;
use solid_create::fetch::fetch_template;
use solid_create::project::{
    retarget_html_entry, set_package_name, temp_dir_for, validate_project_name, write_gitignore,
};
use solid_create::prompt::{cancelable, Prompter};
use solid_create::tasks::{run_many, run_one, Progress, Task};
use solid_create::templates::{templates_for, ProjectKind, Template};
use solid_create::DowngradeOptions;

use crate::config::Settings;

/// Resolved project options after CLI flag parsing or interactive prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectOptions {
    pub name: String,
    pub template: Template,
    pub typescript: bool,
}

/// Raw CLI flags for `solid create`, before resolution into [`ProjectOptions`].
#[derive(Debug, Clone, Default)]
pub struct CliCreateOpts {
    pub name: Option<String>,
    pub start: bool,
    pub vanilla: bool,
    pub template: Option<String>,
    pub js: bool,
    pub ts: bool,
    pub no_interactive: bool,
}

/// Fill in whatever the flags leave open.
///
/// With `--no-interactive` every open choice takes its default: the
/// configured project name, SolidStart, the first template of the kind,
/// and TypeScript. Otherwise the user is asked; backing out of any prompt
/// yields a cancellation error.
pub async fn resolve_options(
    cli: &CliCreateOpts,
    settings: &Settings,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<ProjectOptions> {
    if cli.start && cli.vanilla {
        bail!("--start and --vanilla cannot be used together");
    }
    if cli.js && cli.ts {
        bail!("--js and --ts cannot be used together");
    }

    let name = match &cli.name {
        Some(name) => name.clone(),
        None if cli.no_interactive => settings.default_project_name.clone(),
        None => {
            cancelable(
                async { prompter.text("Project name", Some(settings.default_project_name.as_str())) },
                None,
            )
            .await?
        }
    };
    validate_project_name(&name)?;

    let template = match &cli.template {
        Some(raw) => {
            let template: Template = raw.parse()?;
            let wanted = if cli.start {
                Some(ProjectKind::Start)
            } else if cli.vanilla {
                Some(ProjectKind::Vanilla)
            } else {
                None
            };
            if wanted.is_some_and(|kind| kind != template.kind()) {
                bail!(
                    "template '{template}' is not a {} template",
                    template.kind().dir()
                );
            }
            template
        }
        None => {
            let kind = if cli.start {
                ProjectKind::Start
            } else if cli.vanilla {
                ProjectKind::Vanilla
            } else if cli.no_interactive {
                ProjectKind::Start
            } else {
                let is_start = cancelable(
                    async { prompter.confirm("Is this a SolidStart project?", true) },
                    None,
                )
                .await?;
                ProjectKind::from_start_flag(is_start)
            };
            pick_template(kind, cli.no_interactive, prompter).await?
        }
    };

    let typescript = if cli.ts || cli.js {
        cli.ts
    } else if cli.no_interactive {
        true
    } else {
        cancelable(async { prompter.confirm("Use TypeScript?", true) }, None).await?
    };

    Ok(ProjectOptions {
        name,
        template,
        typescript,
    })
}

async fn pick_template(
    kind: ProjectKind,
    no_interactive: bool,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<Template> {
    let available = templates_for(kind);
    let Some(first) = available.first().copied() else {
        bail!("no {} templates available", kind.dir());
    };
    if no_interactive || available.len() == 1 {
        return Ok(first);
    }

    let names: Vec<&str> = available.iter().map(|t| t.as_str()).collect();
    let index = cancelable(
        async { prompter.select("Which template would you like to use?", &names, 0) },
        None,
    )
    .await?;
    Ok(available.get(index).copied().unwrap_or(first))
}

/// Create a new Solid project under the current directory.
///
/// Resolves options from `cli` (prompting through `prompter` where needed),
/// then fetches the template under a spinner. JavaScript projects are
/// fetched into `<name>/.solid-start` and converted into `<name>`.
/// Returns the project directory.
pub async fn run(
    cli: CliCreateOpts,
    settings: &Settings,
    prompter: &mut dyn Prompter,
    progress: &mut dyn Progress,
) -> anyhow::Result<PathBuf> {
    let opts = resolve_options(&cli, settings, prompter).await?;
    let project_dir = PathBuf::from(&opts.name);
    if project_dir.exists() {
        bail!("Directory '{}' already exists", opts.name);
    }

    println!(
        "{} Creating {} from the {} template ({})",
        "->".blue(),
        opts.name.green(),
        opts.template.to_string().cyan(),
        if opts.typescript { "TypeScript" } else { "JavaScript" }
    );

    generate_project(&opts, &project_dir, progress).await?;
    print_next_steps(&opts.name, &settings.package_manager);
    Ok(project_dir)
}

async fn generate_project(
    opts: &ProjectOptions,
    project_dir: &Path,
    progress: &mut dyn Progress,
) -> anyhow::Result<()> {
    if opts.typescript {
        run_one(
            progress,
            Task::new(
                "Fetching template",
                "Template fetched",
                fetch_template(opts.template, project_dir),
            ),
        )
        .await?;
    } else {
        let temp_dir = temp_dir_for(project_dir);
        run_one(
            progress,
            Task::new(
                "Fetching template",
                "Template fetched",
                fetch_template(opts.template, &temp_dir),
            ),
        )
        .await?;
        run_one(
            progress,
            Task::new(
                "Converting template to JavaScript",
                "Template converted",
                convert_to_js(&temp_dir, project_dir, &DowngradeOptions::default()),
            ),
        )
        .await?;
    }

    let mut finishing = vec![
        Task::new("Writing .gitignore", ".gitignore written", async {
            write_gitignore(project_dir).await.map(drop)
        }),
        Task::new(
            "Setting package name",
            "Package name set",
            set_package_name(project_dir, &opts.name),
        ),
    ];
    if !opts.typescript {
        finishing.push(Task::new(
            "Updating entry points",
            "Entry points updated",
            async { retarget_html_entry(project_dir).await.map(drop) },
        ));
    }
    run_many(progress, finishing).await?;

    tracing::info!(project = %project_dir.display(), "project created");
    Ok(())
}

fn print_next_steps(name: &str, package_manager: &str) {
    println!();
    println!("{}", "Project created!".green().bold());
    println!();
    println!("  cd {name}");
    println!("  {package_manager} install");
    println!("  {package_manager} run dev");
}
