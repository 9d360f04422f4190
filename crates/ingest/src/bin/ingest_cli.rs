use std::env;
use std::io::{self, Read};
use std::path::Path;

use ingest::{input_stats, load_records, parse_records};

fn main() {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let json = match args.iter().position(|arg| arg == "--json") {
        Some(index) => {
            args.remove(index);
            true
        }
        None => false,
    };
    if args.len() != 1 {
        eprintln!("usage: ingest_cli [--json] <path|->");
        std::process::exit(2);
    }

    let path = &args[0];
    let records = if path == "-" {
        let mut data = String::new();
        io::stdin().read_to_string(&mut data).unwrap_or_else(|err| {
            eprintln!("failed to read stdin: {}", err);
            std::process::exit(1);
        });
        parse_records(&data)
    } else {
        load_records(Path::new(path))
    };

    let records = records.unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });
    if records.is_empty() {
        eprintln!("no usage records found");
        std::process::exit(3);
    }

    let stats = input_stats(&records);
    if json {
        match serde_json::to_string_pretty(&stats) {
            Ok(text) => println!("{}", text),
            Err(err) => {
                eprintln!("failed to encode stats: {}", err);
                std::process::exit(1);
            }
        }
        return;
    }
    println!("records {}", stats.records);
    println!("users {}", stats.users);
    if let (Some(first), Some(last)) = (stats.first_day, stats.last_day) {
        println!("days {} {}", first, last);
    }
    println!(
        "user_initiated_interaction_count {}",
        stats.totals.user_initiated_interaction_count
    );
    println!(
        "code_generation_activity_count {}",
        stats.totals.code_generation_activity_count
    );
    println!(
        "code_acceptance_activity_count {}",
        stats.totals.code_acceptance_activity_count
    );
    println!("loc_suggested_to_add_sum {}", stats.totals.loc_suggested_to_add_sum);
    println!("loc_added_sum {}", stats.totals.loc_added_sum);
    println!("acceptance_rate {:.2}", stats.totals.acceptance_rate());
}
