//! Façade-level tests of the catalog operations against the in-memory engine.

use bookcatalog::{memory::MemoryEngine, prelude::*};

fn book(
    title: &str,
    author: &str,
    genre: &str,
    published_year: i32,
    price: f64,
    in_stock: bool,
) -> Book {
    Book {
        title: title.to_string(),
        author: author.to_string(),
        genre: genre.to_string(),
        published_year,
        price,
        in_stock,
    }
}

fn library() -> Vec<Book> {
    vec![
        book("1984", "George Orwell", "Dystopian", 1949, 10.99, true),
        book("Animal Farm", "George Orwell", "Dystopian", 1945, 8.50, true),
        book("The Hobbit", "J.R.R. Tolkien", "Fantasy", 1937, 14.50, true),
        book("Moby Dick", "Herman Melville", "Adventure", 1851, 12.50, false),
        book("The Martian", "Andy Weir", "Science Fiction", 2011, 15.99, true),
        book("Project Hail Mary", "Andy Weir", "Science Fiction", 2021, 18.99, false),
        book("Artemis", "Andy Weir", "Science Fiction", 2017, 13.99, true),
    ]
}

async fn seeded() -> BookCatalog<MemoryEngine> {
    let catalog = BookCatalog::new(MemoryEngine::new());
    catalog.add_books(library()).await.unwrap();
    catalog
}

#[tokio::test]
async fn in_genre_returns_exactly_the_matching_books() {
    let catalog = seeded().await;

    let dystopian = catalog.in_genre("Dystopian").await.unwrap();

    assert_eq!(dystopian.len(), 2);
    assert!(dystopian.iter().all(|b| b.genre == "Dystopian"));

    let empty = catalog.in_genre("Romance").await.unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn published_after_is_strict() {
    let catalog = seeded().await;

    let after_2011 = catalog.published_after(2011).await.unwrap();

    // 2011 itself is excluded
    let titles = after_2011.iter().map(|b| b.title.as_str()).collect::<Vec<_>>();
    assert_eq!(titles, vec!["Project Hail Mary", "Artemis"]);
}

#[tokio::test]
async fn by_author_matches_exactly() {
    let catalog = seeded().await;

    let orwell = catalog.by_author("George Orwell").await.unwrap();

    assert_eq!(orwell.len(), 2);
    assert!(orwell.iter().all(|b| b.author == "George Orwell"));
}

#[tokio::test]
async fn set_price_modifies_the_first_match_once() {
    let catalog = seeded().await;

    assert_eq!(catalog.set_price("The Hobbit", 16.99).await.unwrap(), 1);

    let hobbit = &catalog.find(
        Query::builder().filter(Filter::eq("title", "The Hobbit")).build(),
    )
    .await
    .unwrap()[0];
    assert_eq!(hobbit.price, 16.99);

    assert_eq!(catalog.set_price("No Such Title", 1.0).await.unwrap(), 0);
}

#[tokio::test]
async fn remove_by_title_deletes_one_then_nothing() {
    let catalog = seeded().await;

    assert_eq!(catalog.remove_by_title("Moby Dick").await.unwrap(), 1);
    assert_eq!(catalog.remove_by_title("Moby Dick").await.unwrap(), 0);

    assert!(catalog.by_author("Herman Melville").await.unwrap().is_empty());
}

#[tokio::test]
async fn in_stock_after_requires_both_conditions() {
    let catalog = seeded().await;

    let hits = catalog.in_stock_after(2010).await.unwrap();

    let titles = hits.iter().map(|b| b.title.as_str()).collect::<Vec<_>>();
    // Project Hail Mary is newer but out of stock
    assert_eq!(titles, vec!["The Martian", "Artemis"]);
}

#[tokio::test]
async fn summaries_project_title_author_price_only() {
    let catalog = seeded().await;

    let summaries = catalog.summaries().await.unwrap();

    assert_eq!(summaries.len(), library().len());
    assert!(summaries.contains(&BookSummary {
        title: "1984".to_string(),
        author: "George Orwell".to_string(),
        price: 10.99,
    }));
}

#[tokio::test]
async fn sorted_by_price_orders_the_whole_collection() {
    let catalog = seeded().await;

    let ascending = catalog.sorted_by_price(SortDirection::Asc).await.unwrap();
    let prices = ascending.iter().map(|b| b.price).collect::<Vec<_>>();
    let mut expected = prices.clone();
    expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(prices, expected);

    let descending = catalog.sorted_by_price(SortDirection::Desc).await.unwrap();
    assert_eq!(descending.first().unwrap().price, 18.99);
}

#[tokio::test]
async fn price_sorted_pages_partition_the_collection() {
    let catalog = BookCatalog::new(MemoryEngine::new());
    let books = (0..10)
        .map(|i| book(&format!("vol {i}"), "A", "Serial", 2000 + i, 5.0 + i as f64, true))
        .collect();
    catalog.add_books(books).await.unwrap();

    let first = catalog
        .page_by_price(PageRequest::new(0, 5), SortDirection::Asc)
        .await
        .unwrap();
    let second = catalog
        .page_by_price(PageRequest::new(1, 5), SortDirection::Asc)
        .await
        .unwrap();

    assert_eq!(first.len(), 5);
    assert_eq!(second.len(), 5);
    assert!(first.iter().all(|b| !second.contains(b)));

    let prices = first
        .iter()
        .chain(second.iter())
        .map(|b| b.price)
        .collect::<Vec<_>>();
    assert_eq!(prices, (0..10).map(|i| 5.0 + i as f64).collect::<Vec<_>>());
}

#[tokio::test]
async fn unsorted_page_respects_the_window() {
    let catalog = seeded().await;

    let page = catalog.page(PageRequest::new(1, 3)).await.unwrap();

    assert_eq!(page.len(), 3);
}

#[tokio::test]
async fn average_price_by_genre_is_the_arithmetic_mean() {
    let catalog = BookCatalog::new(MemoryEngine::new());
    catalog
        .add_books(vec![
            book("one", "A", "Fiction", 2000, 10.0, true),
            book("two", "B", "Fiction", 2001, 20.0, true),
            book("three", "C", "Poetry", 2002, 7.0, true),
        ])
        .await
        .unwrap();

    let averages = catalog.average_price_by_genre().await.unwrap();

    assert_eq!(averages.len(), 2);
    assert_eq!(averages["Fiction"], 15.0);
    assert_eq!(averages["Poetry"], 7.0);
}

#[tokio::test]
async fn most_prolific_author_counts_books() {
    let catalog = seeded().await;

    let (author, count) = catalog.most_prolific_author().await.unwrap().unwrap();

    assert_eq!(author, "Andy Weir");
    assert_eq!(count, 3);
}

#[tokio::test]
async fn most_prolific_author_on_empty_collection_is_none() {
    let catalog = BookCatalog::new(MemoryEngine::new());

    assert_eq!(catalog.most_prolific_author().await.unwrap(), None);
}

#[tokio::test]
async fn count_by_decade_buckets_ascending() {
    let catalog = BookCatalog::new(MemoryEngine::new());
    catalog
        .add_books(vec![
            book("a", "A", "Fiction", 1945, 1.0, true),
            book("b", "B", "Fiction", 1951, 1.0, true),
            book("c", "C", "Fiction", 1959, 1.0, true),
            book("d", "D", "Fiction", 1960, 1.0, true),
        ])
        .await
        .unwrap();

    let decades = catalog.count_by_decade().await.unwrap();

    assert_eq!(decades, vec![(1940, 1), (1950, 2), (1960, 1)]);
}

#[tokio::test]
async fn ensure_index_is_idempotent() {
    let catalog = seeded().await;

    catalog.ensure_index(IndexSpec::new().asc("title")).await.unwrap();
    catalog.ensure_index(IndexSpec::new().asc("title")).await.unwrap();
    catalog
        .ensure_index(IndexSpec::new().asc("author").desc("published_year"))
        .await
        .unwrap();
}

#[tokio::test]
async fn explain_reports_engine_statistics() {
    let catalog = seeded().await;
    catalog.ensure_index(IndexSpec::new().asc("title")).await.unwrap();

    let report = catalog
        .explain(Some(Filter::eq("title", "1984")))
        .await
        .unwrap();
    let report = report.as_document().unwrap();

    let stats = report.get_document("executionStats").unwrap();
    assert_eq!(stats.get_i64("nReturned").unwrap(), 1);
    assert_eq!(stats.get_i64("totalDocsExamined").unwrap(), library().len() as i64);

    let planner = report.get_document("queryPlanner").unwrap();
    assert_eq!(planner.get_str("indexName").unwrap(), "title_1");
}
