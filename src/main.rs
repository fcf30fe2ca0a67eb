use reactor_viewer::ViewerConfig;

fn main() -> anyhow::Result<()> {
    reactor_viewer::run(ViewerConfig::from_env())
}
