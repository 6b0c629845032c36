//! geupsik terminal front end.
//!
//! Talks to the NEIS open API directly with the same retrieval path the
//! daemon serves; no running server required.

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use geupsik_assistant::{AnswerOutcome, MealAssistant};
use geupsik_neis::{
    office_list, school_kinds, NeisApi, NeisClient, NeisConfig, RetrievalGateway, SchoolDirectory,
};
use geupsik_nlq::last_weekday;
use geupsik_protocol::SchoolRef;
use std::sync::Arc;

mod display;

#[derive(Parser)]
#[command(name = "geupsik")]
#[command(about = "NEIS 급식 조회 도구", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 자연어 질문으로 급식을 조회합니다
    Ask {
        /// 학교 이름과 날짜 표현을 포함한 질문
        question: String,
    },
    /// 특정 날짜의 급식을 조회합니다
    Meal {
        #[arg(long)]
        school: String,
        /// YYYYMMDD 형식; 생략하면 오늘
        #[arg(long)]
        date: Option<String>,
    },
    /// 이번 주 월요일부터 금요일까지의 급식을 조회합니다
    Week {
        #[arg(long)]
        school: String,
    },
    /// 가장 최근 평일의 급식을 조회합니다
    Last {
        #[arg(long)]
        school: String,
    },
    /// 교육청과 학교급으로 학교를 검색합니다
    Schools {
        /// 교육청 이름 (예: 경기도)
        #[arg(long)]
        office: String,
        /// 학교급 (초등학교/중학교/고등학교/특수학교)
        #[arg(long)]
        kind: String,
        /// 학교 이름 (부분 일치)
        #[arg(long)]
        name: String,
    },
    /// 교육청 목록을 출력합니다
    Offices,
    /// 학교급 목록을 출력합니다
    Kinds,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    // Offline listings work without a key; everything else needs one.
    match &cli.command {
        Commands::Offices => {
            print!("{}", display::render_name_list("교육청 목록", &office_list()));
            return Ok(());
        }
        Commands::Kinds => {
            print!("{}", display::render_name_list("학교급 목록", &school_kinds()));
            return Ok(());
        }
        _ => {}
    }

    let config = NeisConfig::from_env().context("NEIS configuration")?;
    let api = Arc::new(NeisClient::new(config));
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Ask { question } => ask(api, &question, today).await,
        Commands::Meal { school, date } => {
            let date = date.unwrap_or_else(|| today.format("%Y%m%d").to_string());
            meal(api, &school, &date).await
        }
        Commands::Week { school } => week(api, &school, today).await,
        Commands::Last { school } => {
            let date = last_weekday(today).format("%Y%m%d").to_string();
            meal(api, &school, &date).await
        }
        Commands::Schools { office, kind, name } => schools(api, &office, &kind, &name).await,
        Commands::Offices | Commands::Kinds => unreachable!("handled before config load"),
    }
}

async fn resolve_school<A: NeisApi>(api: &Arc<A>, name: &str) -> Result<SchoolRef> {
    let directory = SchoolDirectory::new(Arc::clone(api));
    let Some(school) = directory.find_school(name).await? else {
        bail!("'{name}' 검색 결과가 없습니다.");
    };
    log::debug!("resolved {name} to code {}", school.code);
    Ok(school)
}

async fn ask<A: NeisApi>(api: Arc<A>, question: &str, today: NaiveDate) -> Result<()> {
    let assistant = MealAssistant::new(api);
    match assistant.answer(question, today).await? {
        AnswerOutcome::NeedsSchoolName => {
            println!("어느 학교의 급식을 알려드릴까요? 학교 이름을 포함해 질문해주세요.");
        }
        AnswerOutcome::SchoolNotFound { name } => {
            println!("'{name}' 검색 결과가 없습니다.");
        }
        AnswerOutcome::Daily { school, record, .. } => {
            println!("{} 급식 정보입니다.", school.name);
            print!("{}", display::render_record(&record));
        }
        AnswerOutcome::Weekly { school, days, .. } => {
            print!("{}", display::render_week(&school.name, &days));
        }
    }
    Ok(())
}

async fn meal<A: NeisApi>(api: Arc<A>, school_name: &str, date: &str) -> Result<()> {
    let school = resolve_school(&api, school_name).await?;
    let gateway = RetrievalGateway::new(api);
    let record = gateway.fetch_one(&school, date).await?;
    print!("{}", display::render_record(&record));
    Ok(())
}

async fn week<A: NeisApi>(api: Arc<A>, school_name: &str, today: NaiveDate) -> Result<()> {
    let school = resolve_school(&api, school_name).await?;
    let gateway = RetrievalGateway::new(api);
    let monday = today - Duration::days(i64::from(today.weekday().number_from_monday()) - 1);
    let days = gateway.fetch_range(&school, monday, monday + Duration::days(4)).await;
    print!("{}", display::render_week(&school.name, &days));
    Ok(())
}

async fn schools<A: NeisApi>(api: Arc<A>, office: &str, kind: &str, name: &str) -> Result<()> {
    let directory = SchoolDirectory::new(api);
    let matches = directory.search_schools(office, kind, name).await?;
    print!("{}", display::render_matches(&matches));
    Ok(())
}
