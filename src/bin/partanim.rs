use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use partanim::config::{Clustering, RunConfig};
use partanim::formats::InputFormat;
use partanim::formats::dgs::LabelKind;
use partanim::tools::graphstream::{LayoutKind, LayoutOpts};
use partanim::tools::gvmap::ColorScheme;

#[derive(Parser, Debug)]
#[command(name = "partanim", version, about = "Animate a partitioned network into frames and video")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline: DGS generation, layout, clustering, coloring,
    /// frame rendering, tiling and optional video encoding.
    Render(RenderArgs),
    /// Validate the configuration and input files without invoking any
    /// external tool.
    Check(CommonArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Input network file.
    network: PathBuf,

    /// Partition assignment file (one partition id or -1 per node).
    assignments: PathBuf,

    /// Output directory (recreated on every run).
    output: PathBuf,

    /// Global node arrival order file (defaults to ascending node id).
    #[arg(long)]
    order: Option<PathBuf>,

    /// Format of the input network.
    #[arg(long, value_enum, default_value_t = FormatChoice::Metis)]
    format: FormatChoice,

    /// Number of partitions.
    #[arg(long = "num-partitions", short = 'n', default_value_t = 4)]
    num_partitions: u32,

    /// Community detection tool.
    #[arg(long, value_enum, default_value_t = ClusteringChoice::Oslom2)]
    clustering: ClusteringChoice,

    /// Seed for community detection.
    #[arg(long, default_value_t = 1)]
    cluster_seed: u64,

    /// Infomap calls OSLOM2 may make internally.
    #[arg(long, default_value_t = 0)]
    infomap_calls: u32,

    /// Graph layout.
    #[arg(long, short = 'l', value_enum, default_value_t = LayoutChoice::Springbox)]
    layout: LayoutChoice,

    /// Seed for the graph layout.
    #[arg(long, short = 's', default_value_t = 1)]
    seed: u64,

    /// Force for the linlog layout.
    #[arg(long, short = 'f', default_value_t = 3.0)]
    force: f64,

    /// Attraction factor for the linlog layout.
    #[arg(short = 'a', default_value_t = 0.0)]
    attraction: f64,

    /// Repulsion factor for the linlog layout.
    #[arg(short = 'r', default_value_t = -1.2)]
    repulsion: f64,

    /// Node label contents.
    #[arg(long, value_enum, default_value_t = LabelChoice::Id)]
    label: LabelChoice,

    /// gvmap color scheme.
    #[arg(long, value_enum, default_value_t = ColorSchemeChoice::Pastel)]
    color_scheme: ColorSchemeChoice,

    /// Seed for gvmap coloring.
    #[arg(long, default_value_t = 1)]
    color_seed: u64,

    /// Node size in the rendered frames.
    #[arg(long, default_value_t = 10.0)]
    node_size: f64,

    /// Synthesize hidden placeholder nodes for partition-crossing edges.
    #[arg(long)]
    cut_edges: bool,

    /// Size of cut-edge placeholder nodes.
    #[arg(long, default_value_t = 4.0)]
    cut_edge_node_size: f64,

    /// Frames per second of the animation.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Idle tail per partition, in seconds, so late nodes settle.
    #[arg(long = "settle-time", default_value_t = 1.0)]
    settle_time_s: f64,

    /// Width of one partition tile, in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Height of one partition tile, in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Border around each tile, in pixels.
    #[arg(long, default_value_t = 6)]
    border: u32,

    /// Horizontal gap between laid-out sub-graphs before coloring.
    #[arg(long, default_value_t = 10.0)]
    spacing: f64,

    /// Path of the GraphStream animation jar.
    #[arg(long, default_value = "dgs-graphstream/dist/dgs-graphstream.jar")]
    graphstream_jar: PathBuf,

    /// gvmap binary (the patched fork supporting `-w`).
    #[arg(long, default_value = "gvmap")]
    gvmap_bin: PathBuf,

    /// OSLOM2 undirected binary.
    #[arg(long, default_value = "oslom_undir")]
    oslom2_bin: PathBuf,

    /// Infomap binary.
    #[arg(long, default_value = "Infomap")]
    infomap_bin: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Encode the joined frames into this MP4 (requires `ffmpeg` on PATH).
    #[arg(long)]
    video: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Metis,
    Edgelist,
    Dot,
    Pajek,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ClusteringChoice {
    Oslom2,
    Infomap,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutChoice {
    Springbox,
    Linlog,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LabelChoice {
    Id,
    Order,
    None,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorSchemeChoice {
    Pastel,
    PrimaryColors,
}

fn build_config(common: CommonArgs, video: Option<PathBuf>) -> RunConfig {
    RunConfig {
        network: common.network,
        format: match common.format {
            FormatChoice::Metis => InputFormat::Metis,
            FormatChoice::Edgelist => InputFormat::Edgelist,
            FormatChoice::Dot => InputFormat::Dot,
            FormatChoice::Pajek => InputFormat::Pajek,
        },
        assignments: common.assignments,
        order: common.order,
        output: common.output,
        num_partitions: common.num_partitions,
        clustering: match common.clustering {
            ClusteringChoice::Oslom2 => Clustering::Oslom2,
            ClusteringChoice::Infomap => Clustering::Infomap,
        },
        cluster_seed: common.cluster_seed,
        infomap_calls: common.infomap_calls,
        layout: LayoutOpts {
            layout: match common.layout {
                LayoutChoice::Springbox => LayoutKind::SpringBox,
                LayoutChoice::Linlog => LayoutKind::LinLog,
            },
            seed: common.seed,
            force: common.force,
            attraction: common.attraction,
            repulsion: common.repulsion,
        },
        label: match common.label {
            LabelChoice::Id => LabelKind::Id,
            LabelChoice::Order => LabelKind::Order,
            LabelChoice::None => LabelKind::None,
        },
        color_scheme: match common.color_scheme {
            ColorSchemeChoice::Pastel => ColorScheme::Pastel,
            ColorSchemeChoice::PrimaryColors => ColorScheme::PrimaryColors,
        },
        color_seed: common.color_seed,
        node_size: common.node_size,
        cut_edges: common.cut_edges,
        cut_edge_node_size: common.cut_edge_node_size,
        fps: common.fps,
        settle_time_s: common.settle_time_s,
        frame_width: common.width,
        frame_height: common.height,
        border_size: common.border,
        graph_spacing: common.spacing,
        video,
        graphstream_jar: common.graphstream_jar,
        gvmap_bin: common.gvmap_bin,
        oslom2_bin: common.oslom2_bin,
        infomap_bin: common.infomap_bin,
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = build_config(args.common, args.video);
    let summary = partanim::pipeline::run(&cfg)?;

    eprintln!(
        "rendered {} partitions ({} nodes, {} edges, {} cut-edge placeholders) into {} frames",
        summary.partitions,
        summary.nodes,
        summary.edges,
        summary.cut_placeholders,
        summary.joined_frames
    );
    if let Some(video) = summary.video {
        eprintln!("wrote {}", video.display());
    }
    Ok(())
}

fn cmd_check(args: CommonArgs) -> anyhow::Result<()> {
    let cfg = build_config(args, None);
    cfg.validate()?;

    let graph = partanim::formats::read_graph(&cfg.network, cfg.format)?;
    let assignment = partanim::formats::read_assignments(&cfg.assignments)?;
    if let Some(order) = &cfg.order {
        partanim::formats::read_order(order)?;
    }

    eprintln!(
        "ok: {} nodes, {} edges, {} assignment entries, {} partitions",
        graph.node_count(),
        graph.edge_count(),
        assignment.len(),
        cfg.num_partitions
    );
    Ok(())
}
