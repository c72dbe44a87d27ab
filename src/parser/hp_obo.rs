use std::fs;
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::{HpoError, HpoResult, HpoTermId, Ontology};

/// Tuples of (child, parent) that are connected after all terms are added
type Connections = Vec<(HpoTermId, HpoTermId)>;

#[derive(Debug, Default, PartialEq)]
struct Stanza<'a> {
    id: Option<&'a str>,
    name: Option<&'a str>,
    parents: Vec<&'a str>,
    alt_ids: Vec<&'a str>,
    obsolete: bool,
    replaced_by: Option<&'a str>,
}

pub(crate) fn read_obo_file<P: AsRef<Path>>(filename: P, ontology: &mut Ontology) -> HpoResult<()> {
    let path = filename.as_ref().display().to_string();
    let file_content =
        fs::read_to_string(&filename).map_err(|_| HpoError::CannotOpenFile(path.clone()))?;
    read_obo_str(&file_content, ontology)?;
    debug!("Parsed {} terms from {}", ontology.len(), path);
    Ok(())
}

pub(crate) fn read_obo_str(content: &str, ontology: &mut Ontology) -> HpoResult<()> {
    let mut connections: Connections = Vec::new();
    let mut alt_ids: Connections = Vec::new();
    let mut obsoletes: Vec<(HpoTermId, Option<HpoTermId>)> = Vec::new();

    for block in content.split("\n\n") {
        let block = block.trim_start_matches('\n');
        if let Some(term) = block.strip_prefix("[Term]\n") {
            let stanza = stanza_from_obo(term);
            let (Some(id), Some(name)) = (stanza.id, stanza.name) else {
                warn!("Unable to parse: {}", term);
                continue;
            };
            let id = HpoTermId::try_from(id)?;
            ontology.insert_term(name.to_string(), id);
            for parent in stanza.parents {
                connections.push((id, HpoTermId::try_from(parent)?));
            }
            for alt_id in stanza.alt_ids {
                alt_ids.push((HpoTermId::try_from(alt_id)?, id));
            }
            if stanza.obsolete {
                let replacement = stanza.replaced_by.map(HpoTermId::try_from).transpose()?;
                obsoletes.push((id, replacement));
            }
        } else if block.starts_with("format-version") {
            if let Some(version) = data_version(block) {
                ontology.set_version(version.to_string());
            }
        } else {
            trace!("Ignoring: {}", block);
        }
    }

    for (child, parent) in connections {
        ontology
            .add_parent(parent, child)
            .map_err(|_| HpoError::InvalidInput(format!("{child} is_a {parent}")))?;
    }
    for (alt_id, primary) in alt_ids {
        ontology.add_alt_id(alt_id, primary)?;
    }
    for (id, replacement) in obsoletes {
        ontology.set_obsolete(id, replacement)?;
    }

    ontology.create_cache();
    Ok(())
}

fn stanza_from_obo(term: &str) -> Stanza<'_> {
    let mut stanza = Stanza::default();
    for line in term.lines() {
        let Some((key, value)) = line.split_once(": ") else {
            continue;
        };
        match key {
            "id" => stanza.id = Some(value.trim()),
            "name" => stanza.name = Some(value.trim()),
            "is_a" => stanza.parents.push(first_token(value)),
            "alt_id" => stanza.alt_ids.push(first_token(value)),
            "is_obsolete" => stanza.obsolete = value.trim() == "true",
            "replaced_by" => stanza.replaced_by = Some(first_token(value)),
            _ => (),
        }
    }
    stanza
}

/// `is_a: HP:0000118 ! Phenotypic abnormality` only needs the id
fn first_token(value: &str) -> &str {
    value.split_whitespace().next().unwrap_or_default()
}

/// Extracts the date from the header, e.g. `data-version: hp/releases/2024-01-16`
fn data_version(header: &str) -> Option<&str> {
    header
        .lines()
        .find_map(|line| line.strip_prefix("data-version: "))
        .map(|version| version.trim().rsplit('/').next().unwrap_or(version))
}
