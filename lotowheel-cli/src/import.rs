use anyhow::{Context, Result, bail};
use lotowheel_db::rusqlite::Connection;
use serde::Deserialize;
use std::path::Path;

use lotowheel_db::db::insert_draw;
use lotowheel_db::models::{Draw, LotteryKind, validate_draw};

/// Exports carry numbers either as integers or as zero-padded strings ("04").
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(u32),
    Text(String),
}

impl RawNumber {
    fn value(&self) -> Result<u32> {
        match self {
            RawNumber::Int(n) => Ok(*n),
            RawNumber::Text(s) => s
                .trim()
                .parse::<u32>()
                .with_context(|| format!("Cannot parse number '{}'", s)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawDraw {
    concurso: u32,
    data: String,
    dezenas: Vec<RawNumber>,
    #[serde(default)]
    is_virada: bool,
}

fn parse_date(raw: &str) -> Result<String> {
    let parts: Vec<&str> = raw.trim().split('/').collect();
    if parts.len() != 3 {
        bail!("Invalid date format: '{}'", raw);
    }
    Ok(format!("{}-{}-{}", parts[2], parts[1], parts[0]))
}

fn parse_record(raw: &RawDraw, lottery: LotteryKind) -> Result<Draw> {
    let config = lottery.config();
    let numbers = raw
        .dezenas
        .iter()
        .map(|n| n.value().map(|v| config.normalize(v)))
        .collect::<Result<Vec<_>>>()?;
    validate_draw(&numbers, &config)
        .with_context(|| format!("Contest {}", raw.concurso))?;

    Ok(Draw {
        lottery,
        contest: raw.concurso,
        date: parse_date(&raw.data)?,
        numbers,
        is_special: raw.is_virada,
    })
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_json_str(conn: &Connection, json: &str, lottery: LotteryKind) -> Result<ImportResult> {
    let records: Vec<RawDraw> = serde_json::from_str(json)
        .context("Invalid JSON draw export")?;

    let tx = conn.unchecked_transaction()
        .context("Cannot start transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for raw in &records {
        result.total_records += 1;
        match parse_record(raw, lottery) {
            Ok(draw) => {
                match insert_draw(&tx, &draw) {
                    Ok(true) => result.inserted += 1,
                    Ok(false) => result.skipped += 1,
                    Err(e) => {
                        log::warn!("Insert failed for record {}: {}", result.total_records, e);
                        result.errors += 1;
                    }
                }
            }
            Err(e) => {
                log::warn!("Parse failed for record {}: {:#}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Commit failed")?;
    Ok(result)
}

pub fn import_json(conn: &Connection, path: &Path, lottery: LotteryKind) -> Result<ImportResult> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot open {:?}", path))?;
    import_json_str(conn, &json, lottery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotowheel_db::db::{count_draws, fetch_last_draws, migrate};

    const SAMPLE: &str = r#"[
        {"concurso": 1, "data": "11/03/1996", "dezenas": [4, 5, 30, 33, 41, 52], "is_virada": false},
        {"concurso": 2, "data": "18/03/1996", "dezenas": ["09", "37", "39", "41", "43", "49"]},
        {"concurso": 3, "data": "25/03/1996", "dezenas": [10, 11, 29, 30, 36, 61]},
        {"concurso": 1, "data": "11/03/1996", "dezenas": [4, 5, 30, 33, 41, 52], "is_virada": false}
    ]"#;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("17/02/2026").unwrap(), "2026-02-17");
        assert_eq!(parse_date("01/01/2020").unwrap(), "2020-01-01");
        assert!(parse_date("2020-01-01").is_err());
    }

    #[test]
    fn test_import_counts() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let result = import_json_str(&conn, SAMPLE, LotteryKind::Megasena).unwrap();
        assert_eq!(result.total_records, 4);
        assert_eq!(result.inserted, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.errors, 1, "61 is out of range for megasena");
        assert_eq!(count_draws(&conn, LotteryKind::Megasena).unwrap(), 2);
    }

    #[test]
    fn test_import_string_numbers() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        import_json_str(&conn, SAMPLE, LotteryKind::Megasena).unwrap();

        let draws = fetch_last_draws(&conn, LotteryKind::Megasena, 1).unwrap();
        assert_eq!(draws[0].contest, 2);
        assert_eq!(draws[0].date, "1996-03-18");
        assert_eq!(draws[0].numbers, vec![9, 37, 39, 41, 43, 49]);
    }

    #[test]
    fn test_import_digit_columns() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let json = r#"[{"concurso": 1, "data": "02/10/2020", "dezenas": ["0", "5", "5", "3", "9", "1", "2"]}]"#;

        let result = import_json_str(&conn, json, LotteryKind::Supersete).unwrap();
        assert_eq!(result.inserted, 1);
        assert_eq!(result.errors, 0);
        let draws = fetch_last_draws(&conn, LotteryKind::Supersete, 1).unwrap();
        assert_eq!(draws[0].numbers, vec![0, 5, 5, 3, 9, 1, 2], "column order kept");
    }

    #[test]
    fn test_import_double_zero_as_hundred() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let dezenas: Vec<String> = (1..=19).map(|n| format!("\"{:02}\"", n * 5)).chain(["\"00\"".to_string()]).collect();
        let json = format!(r#"[{{"concurso": 2000, "data": "05/01/2020", "dezenas": [{}]}}]"#, dezenas.join(","));

        let result = import_json_str(&conn, &json, LotteryKind::Lotomania).unwrap();
        assert_eq!(result.inserted, 1);
        assert_eq!(result.errors, 0);
        let draws = fetch_last_draws(&conn, LotteryKind::Lotomania, 1).unwrap();
        assert!(draws[0].numbers.contains(&100));
        assert!(!draws[0].numbers.contains(&0));
    }

    #[test]
    fn test_invalid_json() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert!(import_json_str(&conn, "{not json", LotteryKind::Megasena).is_err());
    }
}
