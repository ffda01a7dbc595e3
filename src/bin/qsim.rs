//! 队列 / CSMA/CD 稳态指标仿真
//!
//! 每个 study 以加倍的 horizon 重复运行，直到相邻两轮的相对误差不超过阈值。

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use qsim_rs::convergence::{ConvergenceController, RoundReport};
use qsim_rs::rv::{Sampler, summarize};
use qsim_rs::study::StudySpec;

#[derive(Debug, Parser)]
#[command(name = "qsim", about = "M/M/1、M/M/1/K 与 CSMA/CD 的离散事件仿真")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 指数分布采样器自检：样本均值/方差与理论值对比
    RvTest {
        #[arg(long, default_value_t = 75.0)]
        rate: f64,
        #[arg(long, default_value_t = 1000)]
        count: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// 无限缓冲区 M/M/1，ρ = 0.25..0.95
    Mm1(RunArgs),
    /// 有限缓冲区 M/M/1/K，ρ = 0.5..1.5，K ∈ {10, 25, 50}
    Mm1k(RunArgs),
    /// CSMA/CD，N ∈ {20..100}
    Csma {
        /// 使用非坚持（non-persistent）模式
        #[arg(long)]
        non_persistent: bool,
        #[command(flatten)]
        run: RunArgs,
    },
    /// 从 JSON 文件加载 study
    Study {
        #[arg(long)]
        file: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
    /// 交互式菜单
    Menu,
}

/// 覆盖 study 的收敛参数
#[derive(Debug, Clone, Default, Args)]
struct RunArgs {
    /// 初始 horizon（秒）
    #[arg(long)]
    start_horizon: Option<f64>,
    /// 相对误差阈值
    #[arg(long)]
    threshold: Option<f64>,
    /// 最大轮数
    #[arg(long)]
    max_rounds: Option<u32>,
    #[arg(long)]
    seed: Option<u64>,
    /// 单次运行预计事件数上限，超出则停止加倍
    #[arg(long)]
    max_events: Option<f64>,
}

impl RunArgs {
    fn apply(&self, spec: &mut StudySpec) {
        if self.start_horizon.is_some() {
            spec.start_horizon_secs = self.start_horizon;
        }
        if self.threshold.is_some() {
            spec.threshold = self.threshold;
        }
        if self.max_rounds.is_some() {
            spec.max_rounds = self.max_rounds;
        }
        if self.seed.is_some() {
            spec.seed = self.seed;
        }
        if self.max_events.is_some() {
            spec.max_events_per_run = self.max_events;
        }
    }
}

fn main() -> ExitCode {
    // 初始化 tracing（报告走 stdout，日志默认只输出 warn 以上）
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    match dispatch(cli.cmd) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cmd: Command) -> qsim_rs::Result<()> {
    match cmd {
        Command::RvTest { rate, count, seed } => rv_test(rate, count, seed),
        Command::Mm1(run) => run_study(StudySpec::mm1(), &run),
        Command::Mm1k(run) => run_study(StudySpec::mm1k(), &run),
        Command::Csma {
            non_persistent,
            run,
        } => run_study(StudySpec::csma(!non_persistent), &run),
        Command::Study { file, run } => run_study(StudySpec::load(&file)?, &run),
        Command::Menu => menu(),
    }
}

fn rv_test(rate: f64, count: usize, seed: Option<u64>) -> qsim_rs::Result<()> {
    let mut sampler = seed.map_or_else(Sampler::from_entropy, Sampler::seeded);
    let s = summarize(&mut sampler, rate, count)?;
    println!("expected_mean={:.8}", s.expected_mean);
    println!("mean={:.8}", s.mean);
    println!("mean_diff_pct={:.4}", s.mean_error_pct());
    println!("expected_variance={:.8}", s.expected_variance);
    println!("variance={:.8}", s.variance);
    println!("variance_diff_pct={:.4}", s.variance_error_pct());
    Ok(())
}

fn run_study(mut spec: StudySpec, run: &RunArgs) -> qsim_rs::Result<()> {
    run.apply(&mut spec);
    let controller = ConvergenceController::new(spec.scenarios()?, spec.settings())?;

    println!("==================== BEGIN SIMULATION ====================");
    let outcome = controller.run_with(print_round)?;
    let rounds = outcome.rounds.len();
    if outcome.converged {
        println!(
            "converged after {rounds} rounds at T={}",
            outcome.final_horizon().unwrap_or_default()
        );
    } else {
        println!("not converged after {rounds} rounds");
    }
    println!("==================== SIMULATION COMPLETE ====================");
    Ok(())
}

fn print_round(report: &RoundReport) {
    println!("round={} T={}", report.round, report.horizon);
    for c in &report.configs {
        let err = c
            .error
            .map_or_else(|| "-".to_string(), |e| format!("{e:.8}"));
        println!("T={} {} {} error={err}", report.horizon, c.label, c.result);
    }
    if let Some(e) = report.max_error {
        println!("round_max_error={e:.8}");
    }
}

fn menu() -> qsim_rs::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let defaults = RunArgs::default();
    loop {
        print!(
            "Choose to run:\n 1. Random variable test\n 2. M/M/1 queue\n 3. M/M/1/K queue\n 4. CSMA/CD persistent\n 5. CSMA/CD non-persistent\n q. Quit\n"
        );
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let result = match line?.trim() {
            "1" => rv_test(75.0, 1000, None),
            "2" => run_study(StudySpec::mm1(), &defaults),
            "3" => run_study(StudySpec::mm1k(), &defaults),
            "4" => run_study(StudySpec::csma(true), &defaults),
            "5" => run_study(StudySpec::csma(false), &defaults),
            "q" | "quit" => return Ok(()),
            _ => {
                println!("Invalid input, please enter a selection");
                continue;
            }
        };
        if let Err(e) = result {
            eprintln!("error: {e}");
        }
    }
}
