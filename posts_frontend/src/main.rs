fn main() -> anyhow::Result<()> {
    posts_frontend::run_frontend()
}
