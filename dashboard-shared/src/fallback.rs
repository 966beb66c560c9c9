/// Static fallback data
///
/// Twenty sample companies served while the stores are unreachable, and an
/// in-memory version of the listing query so the fallback path filters,
/// sorts and pages exactly like the API contract says:
///
/// - search: case-insensitive substring on name or e-mail, plain substring on phone
/// - `date_from`: inclusive from midnight UTC
/// - `date_to`: inclusive to the end of that day, UTC
/// - sort: stable, strings compared case-insensitively, absent values first
///
/// Responses built from this data are flagged `degraded` by the API.

use std::cmp::Ordering;
use std::sync::OnceLock;

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Client, ClientPage, ClientQuery, SortField, SortOrder};

type SampleRow = (
    &'static str,
    Option<&'static str>,
    Option<&'static str>,
    Option<&'static str>,
    (i32, u32, u32),
    [i64; 4],
    bool,
);

const SAMPLE: [SampleRow; 20] = [
    ("Atelier Lambert", Some("contact@atelier-lambert.be"), Some("+32 2 511 42 10"), Some("Rue Haute 12 1000 Belgique"), (2023, 1, 9), [34, 6, 2, 18], true),
    ("Boulangerie Dupont", Some("info@dupont-boulangerie.be"), Some("+32 4 222 18 07"), Some("Place Saint-Lambert 3 4000 Belgique"), (2023, 2, 14), [212, 11, 1, 95], true),
    ("Cabinet Peeters", Some("secretariat@peeters-avocats.be"), Some("+32 3 231 77 45"), Some("Meir 48 2000 Belgique"), (2023, 3, 2), [87, 4, 1, 12], false),
    ("Dubois & Fils", None, Some("+32 65 33 90 12"), Some("Grand-Rue 101 7000 Belgique"), (2023, 3, 28), [145, 3, 3, 61], true),
    ("Entreprise Maes", Some("administration@maes.be"), None, Some("Kouter 7 9000 Belgique"), (2023, 4, 17), [301, 9, 4, 140], true),
    ("Fiduciaire Janssens", Some("fiduciaire@janssens.be"), Some("+32 11 22 45 80"), Some("Grote Markt 15 3500 Belgique"), (2023, 5, 5), [56, 2, 1, 9], false),
    ("Garage Claes", Some("atelier@garage-claes.be"), Some("+32 16 20 11 93"), Some("Naamsestraat 66 3000 Belgique"), (2023, 6, 21), [178, 5, 1, 77], true),
    ("Horeca Jacobs", Some("reservations@jacobs-horeca.be"), Some("+32 50 33 64 21"), Some("Markt 2 8000 Belgique"), (2023, 7, 11), [243, 8, 2, 120], false),
    ("Imprimerie Mertens", Some("devis@imprimerie-mertens.be"), Some("+32 81 22 70 54"), Some("Rue de Fer 29 5000 Belgique"), (2023, 8, 30), [119, 4, 1, 48], true),
    ("Jardins Willems", None, None, Some("Chaussée de Louvain 210 1300 Belgique"), (2023, 9, 18), [64, 1, 1, 21], false),
    ("Kinésithérapie Goossens", Some("rdv@kine-goossens.be"), Some("+32 2 640 15 38"), Some("Avenue Louise 331 1050 Belgique"), (2023, 10, 3), [92, 3, 1, 6], true),
    ("Librairie Wouters", Some("commandes@librairie-wouters.be"), Some("+32 10 45 12 67"), Some("Grand-Place 4 1348 Belgique"), (2023, 11, 22), [131, 5, 1, 53], true),
    ("Menuiserie De Smet", Some("info@desmet-menuiserie.be"), Some("+32 9 223 41 09"), Some("Veldstraat 88 9000 Belgique"), (2023, 12, 8), [158, 6, 2, 84], false),
    ("Notariat Dumont", Some("etude@notaire-dumont.be"), Some("+32 71 31 26 50"), Some("Boulevard Tirou 112 6000 Belgique"), (2024, 1, 15), [73, 2, 1, 11], true),
    ("Optique Leroy", Some("boutique@optique-leroy.be"), Some("+32 87 22 15 73"), Some("Rue Jules Cerexhe 6 4800 Belgique"), (2024, 2, 26), [204, 7, 1, 66], true),
    ("Pharmacie Lambrecht", Some("officine@lambrecht.be"), Some("+32 56 21 98 34"), Some("Grote Markt 41 8500 Belgique"), (2024, 3, 19), [267, 10, 1, 102], false),
    ("Quincaillerie Renard", Some("magasin@renard-quincaillerie.be"), None, Some("Rue du Commerce 17 6700 Belgique"), (2024, 4, 30), [96, 3, 1, 40], true),
    ("Restaurant Vermeulen", Some("chef@vermeulen-resto.be"), Some("+32 3 225 63 19"), Some("Oude Koornmarkt 24 2000 Belgique"), (2024, 5, 14), [189, 6, 2, 91], true),
    ("Studio Hermans", Some("hello@studio-hermans.be"), Some("+32 2 537 80 46"), None, (2024, 6, 6), [41, 2, 1, 5], false),
    ("Transports Lemaire", Some("exploitation@lemaire-transports.be"), Some("+32 69 84 12 77"), Some("Zoning Industriel 9 7500 Belgique"), (2024, 7, 1), [258, 9, 3, 130], true),
];

fn created(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// The sample companies, ids `"1"` to `"20"`
pub fn sample_clients() -> &'static [Client] {
    static CLIENTS: OnceLock<Vec<Client>> = OnceLock::new();

    CLIENTS.get_or_init(|| {
        SAMPLE
            .iter()
            .enumerate()
            .map(|(index, (name, email, phone, address, (y, m, d), counts, legal))| {
                let created_at = created(*y, *m, *d);
                Client {
                    id: (index + 1).to_string(),
                    societe_name: name.to_string(),
                    email: email.map(str::to_string),
                    phone: phone.map(str::to_string),
                    address: address.map(str::to_string),
                    created_at,
                    updated_at: created_at,
                    factures_count: counts[0],
                    contacts_count: counts[1],
                    entreprises_count: counts[2],
                    factures_fournisseurs_count: counts[3],
                    has_legal_unit: *legal,
                }
            })
            .collect()
    })
}

/// Looks a sample company up by id
pub fn find_client(id: &str) -> Option<Client> {
    sample_clients().iter().find(|c| c.id == id).cloned()
}

/// Runs a listing query against `clients` in memory
pub fn query_clients(clients: &[Client], query: &ClientQuery) -> ClientPage {
    let from = query.created_from();
    let to = query.created_to();
    let needle = query.search.to_lowercase();

    let mut matched: Vec<&Client> = clients
        .iter()
        .filter(|c| !query.has_search() || matches_search(c, &query.search, &needle))
        .filter(|c| from.map_or(true, |from| c.created_at >= from))
        .filter(|c| to.map_or(true, |to| c.created_at <= to))
        .collect();

    matched.sort_by(|a, b| {
        let ordering = compare(a, b, query.sort_by);
        match query.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let total = matched.len() as u64;
    let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);

    ClientPage {
        clients: matched
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .cloned()
            .collect(),
        total,
    }
}

fn matches_search(client: &Client, raw: &str, needle: &str) -> bool {
    client.societe_name.to_lowercase().contains(needle)
        || client
            .email
            .as_deref()
            .is_some_and(|email| email.to_lowercase().contains(needle))
        || client.phone.as_deref().is_some_and(|phone| phone.contains(raw))
}

fn compare_text(a: Option<&str>, b: Option<&str>) -> Ordering {
    a.map(str::to_lowercase).cmp(&b.map(str::to_lowercase))
}

fn compare(a: &Client, b: &Client, field: SortField) -> Ordering {
    match field {
        SortField::SocieteName => compare_text(Some(&a.societe_name), Some(&b.societe_name)),
        SortField::Email => compare_text(a.email.as_deref(), b.email.as_deref()),
        SortField::Phone => compare_text(a.phone.as_deref(), b.phone.as_deref()),
        SortField::Address => compare_text(a.address.as_deref(), b.address.as_deref()),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::FacturesCount => a.factures_count.cmp(&b.factures_count),
        SortField::ContactsCount => a.contacts_count.cmp(&b.contacts_count),
        SortField::EntreprisesCount => a.entreprises_count.cmp(&b.entreprises_count),
        SortField::FacturesFournisseursCount => {
            a.factures_fournisseurs_count.cmp(&b.factures_fournisseurs_count)
        }
        SortField::HasLegalUnit => a.has_legal_unit.cmp(&b.has_legal_unit),
    }
}
