use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studytrack::config::{self, AppConfig};
use studytrack::error::{AppError, ErrorResponse};
use studytrack::models::{
    Assignment, Course, EffectiveStatus, NewAssignmentRequest, NewCourseRequest,
};
use studytrack::services::letter_grade::GradeBand;
use studytrack::services::ranking::{
    AssignmentQuery, CourseLookup, SemesterFilter, SortKey, StatusFilter, select_assignments,
    select_courses, unique_semesters,
};
use studytrack::services::summary::{assignment_counts, grade_distribution, percentage_to_gpa};
use studytrack::services::{
    GradeCalculator, assignment_status, assignments_due_on, calendar_month, format_percentage,
    letter_grade,
};
use studytrack::source::JsonFileSource;
use studytrack::{AppState, Snapshot};

#[derive(Parser)]
#[command(name = "studytrack", version, about = "Course and assignment status, grades and GPA")]
struct Cli {
    /// Courses JSON file (overrides STUDYTRACK_COURSES)
    #[arg(long, global = true)]
    courses: Option<PathBuf>,

    /// Assignments JSON file (overrides STUDYTRACK_ASSIGNMENTS)
    #[arg(long, global = true)]
    assignments: Option<PathBuf>,

    /// Evaluate as of this RFC 3339 instant instead of the current time
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Counts, completion rate, average GPA, upcoming and overdue work
    Dashboard,
    /// Credit-weighted GPA and per-course letter grades
    Grades,
    /// Filtered and sorted assignment list
    Assignments {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        #[arg(long, default_value = "due-date")]
        sort: SortKey,
    },
    /// Filtered course list
    Courses {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = "all")]
        semester: SemesterFilter,
    },
    /// Month grid around a date, with the assignments due that day
    Calendar {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Weighted grade for a course from CATEGORY=SCORE entries
    Calculate {
        #[arg(long)]
        course: i64,
        #[arg(long = "entry", value_parser = parse_entry)]
        entries: Vec<(String, String)>,
    },
    /// Validate a course create request and print the normalized record
    NewCourse {
        /// Request body, e.g. '{"name":"Ethics","code":"PHIL 201","instructor":"Dr. Kant"}'
        #[arg(long)]
        json: String,
    },
    /// Validate an assignment create request and print the normalized record
    NewAssignment {
        /// Request body with name, courseId and dueDate
        #[arg(long)]
        json: String,
    },
}

fn parse_entry(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(category, score)| (category.trim().to_string(), score.to_string()))
        .ok_or_else(|| format!("expected CATEGORY=SCORE, got {:?}", raw))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignmentView<'a> {
    #[serde(flatten)]
    assignment: &'a Assignment,
    effective_status: EffectiveStatus,
    course_name: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GradedCourseView<'a> {
    id: i64,
    name: &'a str,
    code: &'a str,
    credits: u32,
    grade: f64,
    letter: &'static str,
    band: GradeBand,
    gpa: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CalendarDayView {
    date: NaiveDate,
    in_month: bool,
    due_count: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config::log_filter()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            let body = serde_json::to_string(&ErrorResponse::from(&e))
                .unwrap_or_else(|_| e.to_string());
            eprintln!("{}", body);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, AppError> {
    let config = AppConfig::new_from_env()?.with_overrides(cli.courses, cli.assignments);
    let now = cli.now.unwrap_or_else(Utc::now);
    info!("Evaluating as of {}", now.to_rfc3339());

    let state = AppState::new(Arc::new(JsonFileSource::from_config(&config)));
    let snapshot = state.snapshot().await?;

    let value = match cli.command {
        Command::Dashboard => dashboard_view(&snapshot, now)?,
        Command::Grades => grades_view(&snapshot)?,
        Command::Assignments {
            query,
            status,
            sort,
        } => {
            let query = AssignmentQuery {
                text: query,
                status,
                sort,
            };
            assignments_view(&snapshot, &query, now)?
        }
        Command::Courses { query, semester } => {
            let courses = select_courses(&snapshot.courses, &query, &semester);
            json!({
                "semesters": unique_semesters(&snapshot.courses),
                "courses": courses,
            })
        }
        Command::Calendar { date } => calendar_view(&snapshot, date.unwrap_or(now.date_naive()), now)?,
        Command::Calculate { course, entries } => calculate_view(&snapshot, course, &entries)?,
        Command::NewCourse { json } => {
            let request: NewCourseRequest = serde_json::from_str(&json)?;
            serde_json::to_value(snapshot.preview_course(request)?)?
        }
        Command::NewAssignment { json } => {
            let request: NewAssignmentRequest = serde_json::from_str(&json)?;
            let assignment = snapshot.preview_assignment(request)?;
            let lookup = CourseLookup::new(&snapshot.courses);
            serde_json::to_value(AssignmentView {
                assignment: &assignment,
                effective_status: assignment_status(&assignment, now),
                course_name: lookup.get(assignment.course_id).map(|c| c.name.as_str()),
            })?
        }
    };

    Ok(serde_json::to_string_pretty(&value)?)
}

fn dashboard_view(snapshot: &Snapshot, now: DateTime<Utc>) -> Result<serde_json::Value, AppError> {
    let summary = snapshot.dashboard(now);
    Ok(json!({
        "summary": serde_json::to_value(&summary)?,
        "upcomingPreview": summary.upcoming_preview(),
    }))
}

fn grades_view(snapshot: &Snapshot) -> Result<serde_json::Value, AppError> {
    let courses: Vec<GradedCourseView> = snapshot
        .courses
        .iter()
        .filter_map(|c| c.graded_percentage().map(|g| graded_course(c, g)))
        .collect();

    Ok(json!({
        "stats": serde_json::to_value(snapshot.grade_stats())?,
        "distribution": grade_distribution(&snapshot.courses),
        "courses": courses,
    }))
}

fn graded_course(course: &Course, grade: f64) -> GradedCourseView<'_> {
    GradedCourseView {
        id: course.id,
        name: &course.name,
        code: &course.code,
        credits: course.credits,
        grade,
        letter: letter_grade(grade),
        band: GradeBand::of(grade),
        gpa: percentage_to_gpa(grade),
    }
}

fn assignments_view(
    snapshot: &Snapshot,
    query: &AssignmentQuery,
    now: DateTime<Utc>,
) -> Result<serde_json::Value, AppError> {
    let lookup = CourseLookup::new(&snapshot.courses);
    let selected: Vec<AssignmentView> = select_assignments(&snapshot.assignments, &lookup, query, now)
        .into_iter()
        .map(|a| AssignmentView {
            assignment: a,
            effective_status: assignment_status(a, now),
            course_name: lookup.get(a.course_id).map(|c| c.name.as_str()),
        })
        .collect();

    Ok(json!({
        "counts": assignment_counts(&snapshot.assignments, now),
        "assignments": selected,
    }))
}

fn calendar_view(
    snapshot: &Snapshot,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<serde_json::Value, AppError> {
    let days: Vec<CalendarDayView> = calendar_month(&snapshot.assignments, date.year(), date.month())
        .ok_or_else(|| AppError::BadRequest(format!("no calendar for {}", date)))?
        .into_iter()
        .map(|day| CalendarDayView {
            date: day.date,
            in_month: day.in_month,
            due_count: day.due.len(),
        })
        .collect();

    let lookup = CourseLookup::new(&snapshot.courses);
    let selected: Vec<AssignmentView> = assignments_due_on(&snapshot.assignments, date)
        .into_iter()
        .map(|a| AssignmentView {
            assignment: a,
            effective_status: assignment_status(a, now),
            course_name: lookup.get(a.course_id).map(|c| c.name.as_str()),
        })
        .collect();

    Ok(json!({
        "month": format!("{}", date.format("%B %Y")),
        "days": days,
        "selectedDate": date,
        "due": selected,
    }))
}

fn calculate_view(
    snapshot: &Snapshot,
    course_id: i64,
    entries: &[(String, String)],
) -> Result<serde_json::Value, AppError> {
    let course = snapshot.course(course_id)?;
    let mut calculator = GradeCalculator::for_course(course);
    for (category, score) in entries {
        calculator.entries_mut().push_score(category, score.as_str());
    }

    let grade = calculator.calculated_grade();
    Ok(json!({
        "course": course.name,
        "categories": calculator.categories(),
        "grade": grade,
        "display": grade.map(format_percentage),
        "letter": grade.map(letter_grade),
    }))
}
