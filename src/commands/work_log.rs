use crate::core::{
    command_init::CommandContext,
    error::Result,
    print_info, print_section_header, print_success,
    wip::is_wip,
    worklog::{parse_date, WorkLog, WorkLogEntry},
};
use chrono::{Duration, Local, NaiveDate, Utc};
use colored::*;

#[derive(Debug, Default)]
pub struct LogOptions {
    pub note: Vec<String>,
    pub yesterday: bool,
    pub date: Option<String>,
    pub standup: bool,
}

pub fn execute_log(options: LogOptions) -> Result<()> {
    let ctx = CommandContext::init()?;
    let work_log = WorkLog::for_repo(&ctx.repo);
    let today = Local::now().date_naive();

    let note = options.note.join(" ").trim().to_string();
    if !note.is_empty() {
        let entry = WorkLogEntry {
            time: Local::now().format("%H:%M").to_string(),
            branch: ctx.current_branch()?,
            message: note,
            hash: None,
        };
        work_log.append(today, &entry)?;
        print_success("Added to today's work log\n");
        return Ok(());
    }

    if options.standup {
        return standup(&ctx, &work_log, today);
    }

    let date = match (&options.date, options.yesterday) {
        (Some(date), _) => parse_date(date)?,
        (None, true) => today - Duration::days(1),
        (None, false) => today,
    };
    show_day(&work_log, date)
}

fn show_day(work_log: &WorkLog, date: NaiveDate) -> Result<()> {
    match work_log.read(date)? {
        Some(content) => {
            println!();
            for line in content.lines() {
                if line.starts_with('#') {
                    println!("{}", line.blue());
                } else {
                    println!("{}", line.white());
                }
            }
            println!();
        }
        None => print_info(&format!("No work log for {}", date.format("%Y-%m-%d"))),
    }
    Ok(())
}

fn print_entries(entries: &[WorkLogEntry]) {
    for entry in entries {
        let hash = entry
            .hash
            .as_deref()
            .map(|h| format!(" ({h})").bright_black().to_string())
            .unwrap_or_default();
        println!(
            "   {} {} {}{}",
            entry.time.bright_black(),
            format!("[{}]", entry.branch).blue(),
            entry.message.white(),
            hash
        );
    }
}

fn standup(ctx: &CommandContext, work_log: &WorkLog, today: NaiveDate) -> Result<()> {
    match work_log.previous_log(today)? {
        Some((day, entries)) => {
            print_section_header(&format!("Previously ({})", day.format("%A %Y-%m-%d")));
            print_entries(&entries);
        }
        None => print_info("Nothing logged in the last week"),
    }

    let todays = work_log.entries(today)?;
    if !todays.is_empty() {
        print_section_header("Today");
        print_entries(&todays);
    }

    let current = ctx.current_branch()?;
    let metadata = ctx.store.load();
    let now = Utc::now();
    let wip: Vec<String> = ctx
        .repo
        .local_branches()?
        .into_iter()
        .filter(|name| {
            let meta = metadata.branches.get(name).cloned().unwrap_or_default();
            is_wip(name, &meta, &ctx.config.preferences, &current, now)
        })
        .collect();

    if !wip.is_empty() {
        print_section_header("In progress");
        for name in &wip {
            match metadata
                .branches
                .get(name)
                .and_then(|m| m.description.as_deref())
            {
                Some(description) => {
                    println!("   {}  {}", name.blue(), description.bright_black())
                }
                None => println!("   {}", name.blue()),
            }
        }
    }
    println!();
    Ok(())
}
