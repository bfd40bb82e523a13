//! Server-rendered pages and the fragments htmx swaps into them.
//!
//! Element ids used as swap targets: `#modal` (forms), `#plants-grid` (the plant
//! list), `#journal-entries` (a plant's journal) and `#journal-entry-{id}`.

use chrono::NaiveDate;
use core_types::{
    GrowthStage, JournalEntry, Plant, PlantHealth, PlantSummary, Species, SUGGESTED_ENTRY_TYPES,
};
use maud::{html, Markup, DOCTYPE};

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@1.9.12";

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn human(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

fn care_date(date: Option<NaiveDate>) -> String {
    date.map(human).unwrap_or_else(|| "Never".to_string())
}

fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                link rel="icon" type="image/svg+xml" href="/favicon.svg";
                link rel="stylesheet" href="/css/styles.css";
                script src=(HTMX_SRC) {}
                script src="/js/app.js" defer {}
            }
            body {
                main .container { (content) }
                div #modal {}
            }
        }
    }
}

/// `GET /`: the full plant list document.
pub fn plants_page(plants: &[PlantSummary]) -> Markup {
    layout(
        "My Pepper Plants",
        html! {
            header .page-header {
                h1 { "My Pepper Plants" }
                button .btn.btn-primary hx-get="/plants/new" hx-target="#modal" { "Add plant" }
            }
            (plants_grid(plants))
        },
    )
}

/// The plant grid, re-rendered after every create and update.
pub fn plants_grid(plants: &[PlantSummary]) -> Markup {
    html! {
        section #plants-grid .plants-grid {
            @if plants.is_empty() {
                p .empty { "No plants yet. Add your first pepper!" }
            }
            @for summary in plants {
                (plant_card(summary))
            }
        }
    }
}

fn plant_card(summary: &PlantSummary) -> Markup {
    let plant = &summary.plant;
    html! {
        article .plant-card id=(format!("plant-{}", plant.id)) {
            @if let Some(image) = &plant.image_path {
                img .plant-image src=(image) alt=(plant.name) loading="lazy";
            }
            h2 { (plant.name) }
            p .species { em { (plant.species.as_str()) } }
            @if plant.is_cross {
                p .cross {
                    "Cross"
                    @if let Some(generation) = &plant.generation { " · " (generation) }
                }
            }
            dl {
                dt { "Health" } dd class=(format!("health-{}", plant.health.as_str().to_lowercase())) { (plant.health.as_str()) }
                dt { "Stage" } dd { (plant.growth_stage.as_str()) }
                dt { "Planted" } dd { (human(plant.planting_date)) }
                dt { "Last watered" } dd { (care_date(summary.last_watered)) }
                dt { "Last fertilized" } dd { (care_date(summary.last_fertilized)) }
            }
            @if !plant.notes.is_empty() {
                p .notes { (plant.notes) }
            }
            footer .card-actions {
                a .btn href=(format!("/plants/{}/journal", plant.id)) { "Journal" }
                button .btn hx-get=(format!("/plants/{}/edit", plant.id)) hx-target="#modal" { "Edit" }
                button .btn.btn-danger
                    hx-delete=(format!("/plants/{}", plant.id))
                    hx-target="closest article"
                    hx-swap="outerHTML"
                    hx-confirm=(format!("Delete {}?", plant.name)) { "Delete" }
            }
        }
    }
}

/// `GET /plants/new`
pub fn new_plant_form() -> Markup {
    plant_form("Add plant", None)
}

/// `GET /plants/:id/edit`
pub fn edit_plant_form(plant: &Plant) -> Markup {
    plant_form("Edit plant", Some(plant))
}

/// New plants are posted to `/plants/create`; existing ones are put to `/plants/:id`.
fn plant_form(heading: &str, plant: Option<&Plant>) -> Markup {
    let species = plant.map(|p| p.species);
    let health = plant.map(|p| p.health);
    let stage = plant.map(|p| p.growth_stage);
    let is_cross = plant.is_some_and(|p| p.is_cross);
    let post = plant.is_none().then_some("/plants/create");
    let put = plant.map(|p| format!("/plants/{}", p.id));

    html! {
        div .modal-backdrop {
            div .modal {
                h2 { (heading) }
                form hx-post=[post] hx-put=[put]
                    hx-encoding="multipart/form-data"
                    hx-target="#plants-grid"
                    hx-swap="outerHTML" {
                    label { "Name"
                        input type="text" name="name" required value=[plant.map(|p| p.name.as_str())];
                    }
                    label { "Species"
                        select name="species" required {
                            @for choice in Species::ALL {
                                option value=(choice.as_str()) selected[species == Some(choice)] { (choice.as_str()) }
                            }
                        }
                    }
                    label { "Health"
                        select name="health" required {
                            @for choice in PlantHealth::ALL {
                                option value=(choice.as_str()) selected[health == Some(choice)] { (choice.as_str()) }
                            }
                        }
                    }
                    label { "Growth stage"
                        select name="growth_stage" required {
                            @for choice in GrowthStage::ALL {
                                option value=(choice.as_str()) selected[stage == Some(choice)] { (choice.as_str()) }
                            }
                        }
                    }
                    label { "Planting date"
                        input type="date" name="planting_date" required value=[plant.map(|p| iso(p.planting_date))];
                    }
                    label { "Cross"
                        select name="cross" {
                            option value="No" selected[!is_cross] { "No" }
                            option value="Yes" selected[is_cross] { "Yes" }
                        }
                    }
                    label { "Generation"
                        input type="text" name="generation" placeholder="F1"
                            value=[plant.and_then(|p| p.generation.as_deref())];
                    }
                    label { "Notes"
                        textarea name="notes" rows="3" { (plant.map(|p| p.notes.as_str()).unwrap_or_default()) }
                    }
                    label { "Photo"
                        input type="file" name="image" accept="image/*";
                    }
                    div .form-actions {
                        button .btn type="button" onclick="closeModal()" { "Cancel" }
                        button .btn.btn-primary type="submit" { "Save" }
                    }
                }
            }
        }
    }
}

/// `GET /plants/:id/journal`: a plant's journal document.
pub fn journal_page(plant: &Plant, entries: &[JournalEntry]) -> Markup {
    layout(
        &format!("{} · Journal", plant.name),
        html! {
            header .page-header {
                a href="/" { "← All plants" }
                h1 { (plant.name) " journal" }
                p .species { em { (plant.species.as_str()) } }
            }
            (new_entry_form(plant.id))
            section #journal-entries .journal-entries {
                @for entry in entries {
                    (journal_entry(entry))
                }
            }
        },
    )
}

fn new_entry_form(plant_id: i32) -> Markup {
    html! {
        form .journal-form
            hx-post=(format!("/plants/{plant_id}/journal"))
            hx-encoding="multipart/form-data"
            hx-target="#journal-entries"
            hx-swap="afterbegin"
            hx-on="htmx:afterRequest: if (event.detail.successful) this.reset()" {
            (entry_fields(None))
            button .btn.btn-primary type="submit" { "Add entry" }
        }
    }
}

fn entry_fields(entry: Option<&JournalEntry>) -> Markup {
    html! {
        label { "Title"
            input type="text" name="title" required value=[entry.map(|e| e.title.as_str())];
        }
        label { "Type"
            input type="text" name="entry_type" list="entry-types" required
                value=[entry.map(|e| e.entry_type.as_str())];
            datalist #entry-types {
                @for kind in SUGGESTED_ENTRY_TYPES { option value=(kind) {} }
            }
        }
        label { "Date"
            input type="date" name="entry_date" required value=[entry.map(|e| iso(e.entry_date))];
        }
        label { "Description"
            textarea name="description" rows="3" { (entry.map(|e| e.description.as_str()).unwrap_or_default()) }
        }
        label { "Photo"
            input type="file" name="image" accept="image/*";
        }
    }
}

/// A single journal entry, returned after it is created or updated.
pub fn journal_entry(entry: &JournalEntry) -> Markup {
    let url = format!("/plants/{}/journal/{}", entry.plant_id, entry.id);
    html! {
        article .journal-entry id=(format!("journal-entry-{}", entry.id)) {
            header {
                time datetime=(iso(entry.entry_date)) { (human(entry.entry_date)) }
                span .entry-type { (entry.entry_type) }
            }
            h3 { (entry.title) }
            @if !entry.description.is_empty() {
                p { (entry.description) }
            }
            @if let Some(image) = &entry.image_path {
                img .entry-image src=(image) alt=(entry.title) loading="lazy";
            }
            footer .card-actions {
                button .btn hx-get=(format!("{url}/edit")) hx-target="closest article" hx-swap="outerHTML" { "Edit" }
                button .btn.btn-danger
                    hx-delete=(url)
                    hx-target="closest article"
                    hx-swap="outerHTML"
                    hx-confirm="Delete this entry?" { "Delete" }
            }
        }
    }
}

/// `GET /plants/:id/journal/:entryId/edit`: swapped in place of the entry.
pub fn edit_journal_entry_form(entry: &JournalEntry) -> Markup {
    html! {
        article .journal-entry.editing id=(format!("journal-entry-{}", entry.id)) {
            form hx-put=(format!("/plants/{}/journal/{}", entry.plant_id, entry.id))
                hx-encoding="multipart/form-data"
                hx-target="closest article"
                hx-swap="outerHTML" {
                (entry_fields(Some(entry)))
                div .form-actions {
                    button .btn.btn-primary type="submit" { "Save" }
                }
            }
        }
    }
}
