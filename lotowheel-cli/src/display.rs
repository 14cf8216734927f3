use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::import::ImportResult;
use lotowheel_core::checker::CheckResult;
use lotowheel_core::engine::{Category, Game};
use lotowheel_core::wheel::WheelResult;
use lotowheel_db::models::{Draw, LotteryConfig, NumberStats};

fn format_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("No draws to show.");
        return;
    }

    let mut table = new_table(vec!["Contest", "Date", "Numbers", "Special"]);
    for draw in draws {
        table.add_row(vec![
            draw.contest.to_string(),
            draw.date.clone(),
            format_numbers(&draw.sorted_numbers()),
            if draw.is_special { "yes".to_string() } else { String::new() },
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import finished:");
    println!("  Records read       : {}", result.total_records);
    println!("  Inserted           : {}", result.inserted);
    println!("  Duplicates skipped : {}", result.skipped);
    if result.errors > 0 {
        println!("  Errors             : {}", result.errors);
    }
}

pub fn display_stats(stats: &[NumberStats], config: &LotteryConfig, window: u32) {
    println!("\n{} statistics over the last {} draws\n", config.name, window);

    let mut table = new_table(vec!["Number", "Frequency", "Delay"]);

    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));

    for stat in &sorted {
        table.add_row(vec![
            &format!("{:2}", stat.number),
            &stat.frequency.to_string(),
            &stat.gap.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_wheel(pool: &[u32], result: &WheelResult) {
    let params = &result.params;
    println!(
        "\nWheel of {} numbers, tickets of {}, guarantee {}{}",
        pool.len(),
        params.ticket_size,
        params.guarantee,
        params
            .condition
            .map(|m| format!(" if {m} drawn numbers are in the pool"))
            .unwrap_or_default(),
    );
    println!("Pool: {}\n", format_numbers(pool));

    let mut table = new_table(vec!["#", "Ticket"]);
    for (i, ticket) in result.tickets.iter().enumerate() {
        table.add_row(vec![format!("{}", i + 1), format_numbers(ticket)]);
    }
    println!("{table}");

    let covered = result.target_count - result.uncovered;
    let status = if result.complete {
        Cell::new("complete").fg(Color::Green)
    } else {
        Cell::new("incomplete").fg(Color::Red)
    };
    let mut summary = new_table(vec!["Tickets", "Tuples covered", "Status"]);
    summary.add_row(vec![
        Cell::new(result.tickets.len()),
        Cell::new(format!("{covered}/{}", result.target_count)),
        status,
    ]);
    println!("{summary}");
}

pub fn display_games(games: &[Game]) {
    if games.is_empty() {
        println!("No game passed the filters. Try another seed or fewer constraints.");
        return;
    }

    let mut table = new_table(vec!["#", "Numbers", "Score", "Category", "Details"]);
    for (i, game) in games.iter().enumerate() {
        let color = match game.category {
            Category::Sniper => Color::Green,
            Category::Balanced => Color::White,
        };
        let details = game
            .results
            .iter()
            .map(|r| format!("{}: {}{}", r.name, r.score, if r.is_valid { "" } else { " (!)" }))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format_numbers(&game.numbers)),
            Cell::new(game.total_score),
            Cell::new(format!("{:?}", game.category).to_uppercase()).fg(color),
            Cell::new(details),
        ]);
    }
    println!("{table}");
}

pub fn display_check(numbers: &[u32], result: Option<&CheckResult>) {
    println!("Game: {}", format_numbers(numbers));
    match result {
        Some(r) => {
            let mut table = new_table(vec!["Hits", "Matched", "Contest", "Date"]);
            table.add_row(vec![
                r.hits.to_string(),
                format_numbers(&r.matched),
                r.contest.to_string(),
                r.date.clone(),
            ]);
            println!("{table}");
        }
        None => println!("No past draw reaches the hit threshold."),
    }
}
