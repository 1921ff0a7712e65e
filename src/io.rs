use crate::model::{GroupId, PersonId, Registry};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Ligne d'import : un nom et un email facultatif.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRow {
    pub name: String,
    pub email: Option<String>,
}

/// Import de personnes depuis CSV: header `name[,email]`
pub fn import_people_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<PersonRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid people row {} (empty name)", line + 2);
        }
        let email = rec
            .get(1)
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);
        out.push(PersonRow { name: name.to_string(), email });
    }
    Ok(out)
}

/// Export JSON du registre (jolie mise en forme)
pub fn export_registry_json<P: AsRef<Path>>(path: P, registry: &Registry) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(registry)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des paires d'une année: header `giver,receiver,year`, trié par donneur.
pub fn export_assignments_csv<P: AsRef<Path>>(
    path: P,
    registry: &Registry,
    group_id: &GroupId,
    year: i32,
) -> anyhow::Result<usize> {
    let mut rows: Vec<(&str, &str)> = registry
        .assignments_for(group_id, year)
        .map(|a| {
            (
                person_name(registry, &a.giver_id),
                person_name(registry, &a.receiver_id),
            )
        })
        .collect();
    rows.sort();

    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["giver", "receiver", "year"])?;
    let mut buf = itoa::Buffer::new();
    let year = buf.format(year);
    for (giver, receiver) in &rows {
        w.write_record([*giver, *receiver, year])?;
    }
    w.flush()?;
    Ok(rows.len())
}

fn person_name<'a>(registry: &'a Registry, id: &PersonId) -> &'a str {
    registry
        .find_person(id)
        .map(|p| p.name.as_str())
        .unwrap_or("")
}
