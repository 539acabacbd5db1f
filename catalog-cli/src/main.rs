use std::fs;
use std::path::Path;
use chrono::Utc;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

use article_filter::pagination::paginate;
use article_filter::{ArticleFilter, CatalogStats, FacetIndex, FilterCriteria, PageControl, SortOrder, DEFAULT_PAGE_SIZE};
use article_search::recommend::DEFAULT_RECOMMEND_LIMIT;
use article_search::{RecommendRequest, Recommendation, Recommender};
use utils_common::labels::{category_label, date_label, difficulty_label, source_label};
use utils_common::{CatalogError, ListingBundle, Locale, Result};
use utils_common::models::ArticleRecord;

mod dump;

const SORT_VALUES: [&str; 7] = [
    "newest",
    "oldest",
    "difficulty_asc",
    "difficulty_desc",
    "length_asc",
    "length_desc",
    "relevance",
];

fn main() {
    let matches = cli().get_matches();

    let level = if matches.get_flag("verbose") { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let result = match matches.subcommand() {
        Some(("bundle", args)) => run_bundle(args),
        Some(("browse", args)) => run_browse(args),
        Some(("facets", args)) => run_facets(args),
        Some(("recommend", args)) => run_recommend(args),
        _ => Err(CatalogError::Validation("缺少子命令".to_string())),
    };

    if let Err(e) = result {
        eprintln!("错误: {}", e);
        std::process::exit(1);
    }
}

fn cli() -> Command {
    let bundle_arg = Arg::new("bundle")
        .short('b')
        .long("bundle")
        .value_name("BUNDLE_FILE")
        .help("文章快照文件路径")
        .required(true);
    let locale_arg = Arg::new("locale")
        .long("locale")
        .value_name("LOCALE")
        .help("显示语言")
        .value_parser(["zh-CN", "en-US"])
        .default_value("zh-CN");

    Command::new("文章目录工具")
        .version(env!("CARGO_PKG_VERSION"))
        .about("打包文章列表快照并离线预览目录")
        .subcommand_required(true)
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("显示详细信息")
            .global(true)
            .action(ArgAction::SetTrue))
        .subcommand(Command::new("bundle")
            .about("合并目录中的列表导出并生成快照")
            .arg(Arg::new("source")
                .short('s')
                .long("source")
                .value_name("SOURCE_DIR")
                .help("列表导出目录路径")
                .required(true))
            .arg(Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUTPUT_FILE")
                .help("快照输出路径")
                .required(true)))
        .subcommand(Command::new("browse")
            .about("按条件筛选、排序并显示一页")
            .arg(bundle_arg.clone())
            .arg(Arg::new("category").long("category").value_name("CATEGORY").help("分类"))
            .arg(Arg::new("difficulty").long("difficulty").value_name("LEVEL").help("难度等级"))
            .arg(Arg::new("source").long("source").value_name("SOURCE").help("来源"))
            .arg(Arg::new("sort")
                .long("sort")
                .value_name("ORDER")
                .help("排序方式")
                .value_parser(SORT_VALUES)
                .default_value("newest"))
            .arg(Arg::new("page")
                .short('p')
                .long("page")
                .value_name("PAGE")
                .help("页码")
                .value_parser(clap::value_parser!(usize))
                .default_value("1"))
            .arg(Arg::new("page_size")
                .long("page-size")
                .value_name("SIZE")
                .help("每页条数")
                .value_parser(clap::value_parser!(usize))
                .default_value("12"))
            .arg(locale_arg.clone()))
        .subcommand(Command::new("facets")
            .about("显示分类、来源、难度分布和统计")
            .arg(bundle_arg.clone())
            .arg(locale_arg.clone()))
        .subcommand(Command::new("recommend")
            .about("按考试等级离线推荐")
            .arg(bundle_arg)
            .arg(Arg::new("exam")
                .short('e')
                .long("exam")
                .value_name("EXAM_LEVEL")
                .help("考试等级，如 CET-6、IELTS-6.5")
                .required(true))
            .arg(Arg::new("limit")
                .long("limit")
                .value_name("N")
                .help("推荐条数")
                .value_parser(clap::value_parser!(usize))
                .default_value("6"))
            .arg(locale_arg))
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a String> {
    args.get_one::<String>(name)
        .ok_or_else(|| CatalogError::Validation(format!("缺少参数 {}", name)))
}

fn locale_of(args: &ArgMatches) -> Locale {
    match args.get_one::<String>("locale").map(String::as_str) {
        Some("en-US") => Locale::EnUs,
        _ => Locale::ZhCn,
    }
}

fn load_bundle(path: &str) -> Result<ListingBundle> {
    let data = fs::read(path)?;
    Ok(ListingBundle::from_compressed(&data)?)
}

fn run_bundle(args: &ArgMatches) -> Result<()> {
    let source_dir = required(args, "source")?;
    let output = required(args, "output")?;

    let source_path = Path::new(source_dir);
    if !source_path.is_dir() {
        return Err(CatalogError::Validation(format!("源目录不存在或不是有效目录 '{}'", source_dir)));
    }

    let start_time = std::time::Instant::now();
    let report = dump::scan_listing_dumps(source_path)?;
    println!(
        "扫描完成。读取 {} 个文件，跳过 {} 个，合并重复文章 {} 篇。",
        report.files_read, report.files_skipped, report.duplicates
    );

    if report.articles.is_empty() {
        return Err(CatalogError::Validation("没有找到有效文章".to_string()));
    }

    let count = report.articles.len();
    let bundle = ListingBundle::new(report.articles, Utc::now());
    let data = bundle.to_compressed()?;

    if let Some(parent) = Path::new(output).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output, &data)?;

    println!(
        "快照生成完成！{} 篇文章，{} 字节，耗时: {:.2}秒",
        count,
        data.len(),
        start_time.elapsed().as_secs_f32()
    );
    Ok(())
}

fn run_browse(args: &ArgMatches) -> Result<()> {
    let bundle = load_bundle(required(args, "bundle")?)?;
    let locale = locale_of(args);

    let criteria = FilterCriteria {
        category: args.get_one::<String>("category").cloned(),
        difficulty_level: args.get_one::<String>("difficulty").cloned(),
        source: args.get_one::<String>("source").cloned(),
    };
    let order = parse_sort(required(args, "sort")?)?;
    let page = args.get_one::<usize>("page").copied().unwrap_or(1);
    let page_size = args.get_one::<usize>("page_size").copied().unwrap_or(DEFAULT_PAGE_SIZE);

    let ordered = ArticleFilter::apply(&bundle.articles, &criteria, order);
    let (slice, descriptor) = paginate(&ordered, page, page_size);

    println!("共 {} 篇文章，第 {}/{} 页", descriptor.total_items, descriptor.current_page, descriptor.total_pages);
    for article in &slice {
        println!("{}", render_line(article, locale));
    }
    if !descriptor.controls.is_empty() {
        println!("{}", render_controls(&descriptor.controls));
    }
    Ok(())
}

fn run_facets(args: &ArgMatches) -> Result<()> {
    let bundle = load_bundle(required(args, "bundle")?)?;
    let locale = locale_of(args);

    let facets = FacetIndex::from_articles(&bundle.articles);
    let stats = CatalogStats::from_articles(&bundle.articles);

    println!("快照时间: {}", bundle.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("文章总数: {}", stats.total_articles);
    println!("平均难度: {:.1}", stats.average_difficulty);
    println!("最近更新: {}", date_label(stats.last_update.as_deref(), locale));
    println!("分类: {}", facets.categories.join(", "));
    println!("来源: {}", facets.sources.join(", "));
    for entry in &facets.difficulties {
        println!(
            "  {}: {}",
            difficulty_label(Some(entry.difficulty_level.as_str()), locale),
            entry.count
        );
    }
    Ok(())
}

fn run_recommend(args: &ArgMatches) -> Result<()> {
    let bundle = load_bundle(required(args, "bundle")?)?;
    let locale = locale_of(args);
    let limit = args.get_one::<usize>("limit").copied().unwrap_or(DEFAULT_RECOMMEND_LIMIT);

    let request = RecommendRequest::new(required(args, "exam")?, limit)?;
    match Recommender::select_from(&bundle.articles, &request) {
        Recommendation::Articles { exam_level, articles } => {
            println!("适合 {} 的文章 {} 篇:", exam_level, articles.len());
            for article in &articles {
                println!("{}", render_line(article, locale));
            }
        }
        Recommendation::NoMatch { exam_level } => {
            println!("暂无适合 {} 水平的文章", exam_level);
        }
    }
    Ok(())
}

fn parse_sort(raw: &str) -> Result<SortOrder> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|e| CatalogError::Validation(format!("无效的排序方式 {}: {}", raw, e)))
}

/// 单篇文章的一行摘要
fn render_line(article: &ArticleRecord, locale: Locale) -> String {
    format!(
        "[{}] {} | {} | {} | {} | {} 词 | {}",
        article.id,
        article.title.as_deref().unwrap_or(""),
        category_label(article.category.as_deref(), locale),
        difficulty_label(article.difficulty_level.as_deref(), locale),
        source_label(article.source.as_deref(), locale),
        article.words_or_zero(),
        date_label(article.publish_date.as_deref(), locale),
    )
}

/// 页码控件的文本形式，当前页加方括号
fn render_controls(controls: &[PageControl]) -> String {
    controls
        .iter()
        .map(|control| match control {
            PageControl::Previous { .. } => "上一页".to_string(),
            PageControl::Page { page, active: true } => format!("[{}]", page),
            PageControl::Page { page, .. } => page.to_string(),
            PageControl::Ellipsis => "...".to_string(),
            PageControl::Next { .. } => "下一页".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
