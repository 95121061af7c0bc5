//! Ranch dashboard walkthrough: load, search, filter, sort and page a ranch list
//!
//! Run with `RUST_LOG=ranch_view=debug` to see the pipeline decisions.

use anyhow::Result;
use ranch_view::prelude::*;
use ranch_view::telemetry;

fn sample_ranches() -> Vec<Record> {
    let rows = [
        ("El Norteño", "Chihuahua", "Familia Terrazas", 1200.0, 340, "activo"),
        ("Rancho Norte", "Sonora", "Cooperativa Ganadera", 300.0, 95, "activo"),
        ("Rancho Sur", "Oaxaca", "Juan Pérez", 45.5, 12, "inactivo"),
        ("La Esperanza", "Sonora", "María López", 75.0, 30, "activo"),
        ("San Isidro", "Jalisco", "Hermanos Ruiz", 10.0, 4, "activo"),
        ("Los Alamos", "Durango", "Cooperativa Ganadera", 640.0, 150, "activo"),
        ("Santa Fe", "Sonora", "Ana Gómez", 88.0, 21, "inactivo"),
    ];

    rows.iter()
        .enumerate()
        .filter_map(|(i, (name, location, owner, hectares, head, status))| {
            Record::from_value(json!({
                "id": format!("r{}", i + 1),
                "name": name,
                "location": location,
                "owner": owner,
                "surfaceHectares": hectares,
                "cattleCount": head,
                "status": status,
            }))
        })
        .collect()
}

fn print_page(title: &str, view: &CollectionView) {
    let meta = view.meta();
    println!(
        "\n📋 {} (page {}/{}, {} ranches)",
        title, meta.page, meta.total_pages, meta.total
    );
    for ranch in view.paged_records() {
        println!(
            "   {:<14} {:<10} {:>8} ha  {}",
            ranch.text("name"),
            ranch.text("location"),
            ranch.text("surfaceHectares"),
            ranch.text("status"),
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing()?;

    println!("🐄 Ranch dashboard\n");

    let source = InMemorySource::with_records(collections::ranch::NAME, sample_ranches());
    let config = collections::ranch::config().with_items_per_page(3);
    let handle = ViewHandle::new(source.clone(), CollectionView::new(config)?);

    let outcome = handle.refresh().await?;
    println!("✅ Loaded: {:?}", outcome);
    print_page("All ranches", &*handle.read().await);

    {
        let mut view = handle.write().await;
        view.next_page();
        print_page("Next page", &view);

        view.set_search_term("norte");
        print_page("Search 'norte'", &view);

        view.set_search_term("");
        view.set_filter("superficie_min", json!(60));
        view.set_filter("ubicacion", json!("sonora"));
        print_page("Sonora, at least 60 ha", &view);

        view.set_sort("surfaceHectares");
        view.set_sort("surfaceHectares");
        print_page("Largest first", &view);

        println!(
            "\n🔗 Share this view: {:?}",
            QueryParams::from_view_state(view.state())
        );
    }

    handle.update("r7", json!({ "status": "activo" })).await?;
    handle.delete("r2").await?;
    {
        let view = handle.read().await;
        print_page("After update and delete", &view);
        println!("\n🌾 Total surface shown: {} ha", view.sum("surfaceHectares"));
    }

    let err = handle.delete("r404").await.err();
    if let Some(err) = err {
        println!("\n⚠️  {} ({})", err, err.error_code());
    }

    println!("\n✨ {} ranches left in the source", source.len());
    Ok(())
}
