//! Interactive menu shell.
//!
//! Presentation layer only. The shell prints prompts and reports, reads raw
//! command input, and delegates every action to a [`Catalog`] method.
//! Expected absences come back as outcome variants and get their one-line
//! phrasings; real failures are reported on a single diagnostic line and the
//! session keeps going.
//!
//! The loop and prompts are generic over the line reader and the output
//! writer. Production wires up stdin and stdout; the tests feed a canned
//! script and assert the printed surface.

use crate::catalog::{Catalog, DownloadOutcome, StatsReport, UploadOutcome};
use crate::config::DEFAULT_CONFIG_FILE;
use crate::db::models::assets::AssetDBResponse;
use crate::db::models::users::UserDBResponse;
use crate::errors::{Error, Result};
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line reader over standard input, shared by every prompt in a session.
pub type InputLines = Lines<BufReader<Stdin>>;

/// Build the session's input reader. Only one should exist per process;
/// a second buffered reader would swallow piped input through read-ahead.
pub fn input_lines() -> InputLines {
    BufReader::new(tokio::io::stdin()).lines()
}

/// Ask which config file to use. ENTER takes the default.
pub async fn prompt_for_config_file<R, W>(
    lines: &mut Lines<R>,
    out: &mut W,
) -> std::io::Result<String>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "What config file to use for this session?")?;
    writeln!(out, "Press ENTER to use default ({DEFAULT_CONFIG_FILE}),")?;
    writeln!(out, "otherwise enter name of config file>")?;

    let choice = lines.next_line().await?.unwrap_or_default();
    if choice.is_empty() {
        Ok(DEFAULT_CONFIG_FILE.to_string())
    } else {
        Ok(choice)
    }
}

/// Run the menu loop until the user enters 0 or input ends.
pub async fn run_shell<R, W>(
    catalog: &mut Catalog,
    lines: &mut Lines<R>,
    out: &mut W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut command = next_command(lines, out).await?;

    while command != 0 {
        match command {
            1 => match catalog.stats().await {
                Ok(report) => print_stats(out, &report)?,
                Err(err) => report_failure(out, "stats", err)?,
            },
            2 => match catalog.list_users().await {
                Ok(users) => print_users(out, &users)?,
                Err(err) => report_failure(out, "users", err)?,
            },
            3 => match catalog.list_assets().await {
                Ok(assets) => print_assets(out, &assets)?,
                Err(err) => report_failure(out, "assets", err)?,
            },
            4 => download_command(catalog, lines, out, false).await?,
            5 => download_command(catalog, lines, out, true).await?,
            6 => upload_command(catalog, lines, out).await?,
            7 => add_user_command(catalog, lines, out).await?,
            _ => writeln!(out, "** Unknown command, try again...")?,
        }

        command = next_command(lines, out).await?;
    }

    Ok(())
}

/// Parse one line of menu input. `None` means not an integer at all.
fn parse_command(line: &str) -> Option<i32> {
    line.trim().parse().ok()
}

async fn next_command<R, W>(lines: &mut Lines<R>, out: &mut W) -> std::io::Result<i32>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out)?;
    writeln!(out, ">> Enter a command:")?;
    writeln!(out, "   0 => end")?;
    writeln!(out, "   1 => stats")?;
    writeln!(out, "   2 => users")?;
    writeln!(out, "   3 => assets")?;
    writeln!(out, "   4 => download")?;
    writeln!(out, "   5 => download and display")?;
    writeln!(out, "   6 => upload")?;
    writeln!(out, "   7 => add user")?;

    let Some(line) = lines.next_line().await? else {
        // Closed stdin: nothing more will ever arrive, end cleanly
        return Ok(0);
    };

    match parse_command(&line) {
        Some(command) => Ok(command),
        None => {
            writeln!(out, "ERROR")?;
            writeln!(out, "ERROR: invalid input")?;
            writeln!(out, "ERROR")?;
            Ok(-1)
        }
    }
}

async fn download_command<R, W>(
    catalog: &mut Catalog,
    lines: &mut Lines<R>,
    out: &mut W,
    display: bool,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Enter asset id>")?;
    let Some(asset_id) = lines.next_line().await? else {
        return Ok(());
    };

    match catalog.download(&asset_id).await {
        Ok(DownloadOutcome::NoSuchAsset) => writeln!(out, "No such asset...")?,
        Ok(DownloadOutcome::Saved {
            original_name,
            path,
        }) => {
            writeln!(out, "Downloaded from S3 and saved as ' {original_name} '")?;
            if display {
                if let Err(err) = render_image(&path) {
                    report_failure(out, "display", err)?;
                }
            }
        }
        Err(err) => report_failure(out, "download", err)?,
    }

    Ok(())
}

async fn upload_command<R, W>(
    catalog: &mut Catalog,
    lines: &mut Lines<R>,
    out: &mut W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Enter local filename>")?;
    let Some(filename) = lines.next_line().await? else {
        return Ok(());
    };

    // Short-circuit before asking for a user id, so a mistyped path costs
    // one prompt instead of two. The operation checks again itself.
    if !Path::new(&filename).is_file() {
        writeln!(out, "Local file '{filename}' does not exist...")?;
        return Ok(());
    }

    writeln!(out, "Enter user id>")?;
    let Some(user_id) = lines.next_line().await? else {
        return Ok(());
    };

    match catalog.upload(&filename, &user_id).await {
        Ok(UploadOutcome::MissingLocalFile) => {
            writeln!(out, "Local file '{filename}' does not exist...")?
        }
        Ok(UploadOutcome::NoSuchUser) => writeln!(out, "No such user...")?,
        Ok(UploadOutcome::Stored {
            asset_id,
            storage_key,
        }) => {
            writeln!(out, "Uploaded and stored in S3 as '{storage_key}'")?;
            writeln!(out, "Recorded in RDS under asset id {asset_id}")?;
        }
        Err(err) => report_failure(out, "upload", err)?,
    }

    Ok(())
}

async fn add_user_command<R, W>(
    catalog: &mut Catalog,
    lines: &mut Lines<R>,
    out: &mut W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Enter user's email>")?;
    let Some(email) = lines.next_line().await? else {
        return Ok(());
    };

    writeln!(out, "Enter user's last (family) name>")?;
    let Some(last_name) = lines.next_line().await? else {
        return Ok(());
    };

    writeln!(out, "Enter user's first (family) name>")?;
    let Some(first_name) = lines.next_line().await? else {
        return Ok(());
    };

    match catalog.add_user(&email, &last_name, &first_name).await {
        Ok(user_id) => writeln!(out, "Recorded in RDS under {user_id}")?,
        Err(err) => report_failure(out, "add user", err)?,
    }

    Ok(())
}

fn print_stats<W: Write>(out: &mut W, report: &StatsReport) -> std::io::Result<()> {
    writeln!(out, "S3 bucket name: {}", report.bucket_name)?;
    writeln!(out, "S3 assets: {}", report.object_count)?;
    writeln!(out, "RDS MySQL endpoint: {}", report.database_label)?;
    writeln!(out, "# of users:  {}", report.user_count)?;
    writeln!(out, "# of assets:  {}", report.asset_count)?;
    Ok(())
}

fn print_users<W: Write>(out: &mut W, users: &[UserDBResponse]) -> std::io::Result<()> {
    for user in users {
        writeln!(out, "User id: {}", user.user_id)?;
        writeln!(out, "  Email: {}", user.email)?;
        writeln!(out, "  Name: {} , {}", user.last_name, user.first_name)?;
        writeln!(out, "  Folder: {}", user.storage_folder)?;
    }
    Ok(())
}

fn print_assets<W: Write>(out: &mut W, assets: &[AssetDBResponse]) -> std::io::Result<()> {
    for asset in assets {
        writeln!(out, "Asset id: {}", asset.asset_id)?;
        writeln!(out, "  User id: {}", asset.user_id)?;
        writeln!(out, "  Original name: {}", asset.original_name)?;
        writeln!(out, "  Key name: {}", asset.storage_key)?;
    }
    Ok(())
}

/// One diagnostic line per failed operation; the session continues.
fn report_failure<W: Write>(out: &mut W, operation: &str, err: Error) -> std::io::Result<()> {
    let report = anyhow::Error::from(err);
    writeln!(out, "**ERROR: {operation} failed: {report:#}")
}

/// Render the image inline in the terminal, scrolling with the session
/// output rather than repositioning the cursor.
fn render_image(path: &Path) -> Result<()> {
    let config = viuer::Config {
        absolute_offset: false,
        ..Default::default()
    };

    let source = path.to_string_lossy().into_owned();
    viuer::print_from_file(&source, &config)?;
    Ok(())
}
