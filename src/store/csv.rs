use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::store::LoadSet;

/// Writes the row set as a CSV file, header included, replacing any
/// existing file. Parent directories are created as needed.
pub fn write_csv(path: &Path, rows: &LoadSet) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut out = String::new();

    if rows.has_tier_column() {
        out.push_str("track_name,artist_name,album_name,popularity,popularity_tier\n");
    } else {
        out.push_str("track_name,artist_name,album_name,popularity\n");
    }

    match rows {
        LoadSet::Raw(tracks) => {
            for t in tracks {
                out.push_str(&format!(
                    "{},{},{},{}\n",
                    escape_field(&t.track_name),
                    escape_field(&t.artist_name),
                    escape_field(&t.album_name),
                    t.popularity
                ));
            }
        }
        LoadSet::Cleaned(tracks) => {
            for t in tracks {
                out.push_str(&format!(
                    "{},{},{},{},{}\n",
                    escape_field(&t.detail.track_name),
                    escape_field(&t.detail.artist_name),
                    escape_field(&t.detail.album_name),
                    t.detail.popularity,
                    t.popularity_tier.as_str()
                ));
            }
        }
    }

    fs::write(path, out)?;

    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(rows.len())
}

/// Quotes a field when it contains a comma, quote, or line break; embedded
/// quotes are doubled.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify::TrackDetail;
    use crate::transform::clean_and_transform;

    fn temp_csv(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("spotify2sqlite_{}_{}.csv", name, std::process::id()))
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("Heavy"), "Heavy");
        assert_eq!(
            escape_field("Don't Stop, Believin'"),
            "\"Don't Stop, Believin'\""
        );
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_write_cleaned_csv() {
        let path = temp_csv("cleaned");

        let rows = clean_and_transform(vec![TrackDetail::mock(
            "Rewrite The Stars",
            "James Arthur",
            "The Greatest Showman: Reimagined (Deluxe)",
            72,
        )]);
        let written = write_csv(&path, &LoadSet::Cleaned(rows)).unwrap();
        assert_eq!(written, 1);

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "track_name,artist_name,album_name,popularity,popularity_tier"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Rewrite The Stars,James Arthur,The Greatest Showman: Reimagined (Deluxe),72,popular"
        );

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_raw_csv_has_no_tier_column() {
        let path = temp_csv("raw");

        let rows = LoadSet::Raw(vec![TrackDetail::mock("Heavy", "Anne-Marie", "a,b", 44)]);
        write_csv(&path, &rows).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "track_name,artist_name,album_name,popularity"
        );
        assert_eq!(lines.next().unwrap(), "Heavy,Anne-Marie,\"a,b\",44");

        fs::remove_file(&path).unwrap();
    }
}
