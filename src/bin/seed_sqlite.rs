use anyhow::Result;

use rentaldb::connection::{Connection, Connector};
use rentaldb::executor;
use rentaldb::script::Script;

fn main() -> Result<()> {
    let path = std::path::Path::new("dev/sqlite");
    std::fs::create_dir_all(path)?;
    let db_path = path.join("rentals.db");

    let conn = Connection::parse_dsn(&format!("sqlite://{}", db_path.display()))?;
    let mut session = conn.connect()?;
    let mut stdout = std::io::stdout().lock();
    for script in [Script::Drop, Script::Create, Script::Seed] {
        let statements = script.statements(conn.r#type);
        let outcomes = executor::run_script(session.as_mut(), &statements, &mut stdout)?;
        if let Some(failed) = outcomes.iter().find(|o| !o.is_success()) {
            anyhow::bail!("{script:?} script failed: {failed}");
        }
    }
    session.close()?;

    println!("Seeded SQLite at {}", db_path.display());
    Ok(())
}
