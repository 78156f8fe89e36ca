mod command;
mod data;

fn main() -> anyhow::Result<()> {
    command::run()
}
