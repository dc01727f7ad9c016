use chrono::Datelike;
use tracing::info;

use crate::cli::session::Session;
use crate::cli::ui::{confirm, PromptSpec, Prompted};
use crate::domain::book::{format_isbn13, parse_isbn13};
use crate::domain::Book;

use super::author_flow::select_author;
use super::publisher_flow::select_publisher;
use super::{ask_existing_isbn, format_date, parse_past_date, FlowOutcome, FlowResult};

pub fn list_books(session: &mut Session) -> FlowOutcome<()> {
    session.heading("List all books")?;
    session.say("All books in the database\n")?;

    let books = session.catalog.books();
    if books.is_empty() {
        session.say("No books yet.")?;
    }
    for book in books {
        let line = book_line(session, &book);
        session.say(line)?;
    }
    Ok(FlowResult::Completed(()))
}

fn book_line(session: &Session, book: &Book) -> String {
    let (last, first) = session
        .catalog
        .author(book.author_id)
        .map(|a| (a.last_name, a.first_name))
        .unwrap_or_else(|| ("Unknown".into(), "author".into()));
    let publisher = session
        .catalog
        .publisher(book.publisher_id)
        .map(|p| p.name)
        .unwrap_or_else(|| "Unknown publisher".into());
    format!(
        "{last}, {first} ({}). {} ({}), {} s. {publisher}",
        book.publishing_date.year(),
        book.title,
        format_isbn13(book.isbn13),
        book.total_pages
    )
}

/// Accepts `149.50` as well as `149,50`.
fn parse_price(input: &str) -> Option<f64> {
    input
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price > 0.0)
}

fn parse_pages(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok().filter(|pages| *pages > 0)
}

/// Asks for an ISBN no other book uses. `keep` is the book's current ISBN
/// in edit flows, which stays acceptable.
fn ask_unique_isbn(session: &mut Session, keep: Option<i64>) -> FlowOutcome<i64> {
    let catalog = &session.catalog;
    let free = move |isbn: i64| Some(isbn) == keep || !catalog.book_exists(isbn);

    let answer = PromptSpec::new(
        "ISBN13",
        "Invalid ISBN13. ISBN13 must be unique and contain 13 integers.",
        move |input| parse_isbn13(input).filter(|isbn| free(*isbn)),
    )
    .with_validator(move |input| parse_isbn13(input).map_or(false, free))
    .with_default(keep.map(format_isbn13).unwrap_or_default())
    .ask(session.terminal.as_mut())?;

    Ok(match answer {
        Prompted::Value(isbn) => FlowResult::Completed(isbn),
        Prompted::Canceled => FlowResult::Canceled,
    })
}

/// Title, language, price, publishing date and pages. With `prefill` each
/// prompt starts from the book's current value.
fn ask_book_details(session: &mut Session, mut book: Book, prefill: bool) -> FlowOutcome<Book> {
    let today = session.today();
    let term = session.terminal.as_mut();

    let initial = |value: String| if prefill { value } else { String::new() };

    let Prompted::Value(title) = PromptSpec::text("Title", "Invalid Title.")
        .with_default(initial(book.title.clone()))
        .ask(term)?
    else {
        return Ok(FlowResult::Canceled);
    };

    let Prompted::Value(language) = PromptSpec::text("Language", "Invalid language.")
        .with_default(initial(book.language.clone()))
        .ask(term)?
    else {
        return Ok(FlowResult::Canceled);
    };

    let Prompted::Value(price) = PromptSpec::new(
        "Price (SEK)",
        "Invalid price. Price must be a number larger than 0.",
        parse_price,
    )
    .with_validator(|input| parse_price(input).is_some())
    .with_default(initial(book.price_sek.to_string()))
    .ask(term)?
    else {
        return Ok(FlowResult::Canceled);
    };

    let Prompted::Value(publishing_date) = PromptSpec::new(
        "Publishing date (yyyy-mm-dd)",
        "Invalid date. The date can not be later than today.",
        move |input| parse_past_date(input, today),
    )
    .with_validator(move |input| parse_past_date(input, today).is_some())
    .with_default(initial(format_date(book.publishing_date)))
    .ask(term)?
    else {
        return Ok(FlowResult::Canceled);
    };

    let Prompted::Value(total_pages) = PromptSpec::new(
        "Total pages",
        "Invalid number of pages. Pages must be larger than 0.",
        parse_pages,
    )
    .with_validator(|input| parse_pages(input).is_some())
    .with_default(initial(book.total_pages.to_string()))
    .ask(term)?
    else {
        return Ok(FlowResult::Canceled);
    };

    book.title = title.trim().to_string();
    book.language = language.trim().to_string();
    book.price_sek = price;
    book.publishing_date = publishing_date;
    book.total_pages = total_pages;
    Ok(FlowResult::Completed(book))
}

pub fn add_book(session: &mut Session) -> FlowOutcome<Book> {
    session.heading("Add new book")?;

    let author = match select_author(session, None)?.completed() {
        Ok(author) => author,
        Err(stop) => return Ok(stop),
    };
    let publisher = match select_publisher(session, None)?.completed() {
        Ok(publisher) => publisher,
        Err(stop) => return Ok(stop),
    };

    session.section("Book details")?;
    let isbn13 = match ask_unique_isbn(session, None)?.completed() {
        Ok(isbn13) => isbn13,
        Err(stop) => return Ok(stop),
    };

    let draft = Book::draft(isbn13, author.id, publisher.id, session.today());
    let book = match ask_book_details(session, draft, false)?.completed() {
        Ok(book) => book,
        Err(stop) => return Ok(stop),
    };

    match session.catalog.create_book(book) {
        Ok(created) => {
            info!(isbn13 = created.isbn13, "book added");
            session.success("New book was successfully added")?;
            Ok(FlowResult::Completed(created))
        }
        Err(err) => {
            session.report_update_failure(&err)?;
            Ok(FlowResult::Absent)
        }
    }
}

pub fn edit_book(session: &mut Session) -> FlowOutcome<Book> {
    session.heading("Edit book")?;

    let Prompted::Value(original) = ask_existing_isbn(
        session.terminal.as_mut(),
        "Select book to edit by ISBN13",
        |isbn| session.catalog.book_exists(isbn),
    )?
    else {
        return Ok(FlowResult::Canceled);
    };

    let Some(mut book) = session.catalog.book(original) else {
        session.error("Couldn't fetch book.")?;
        return Ok(FlowResult::Absent);
    };

    let author = match select_author(session, Some(book.author_id))?.completed() {
        Ok(author) => author,
        Err(stop) => return Ok(stop),
    };
    let publisher = match select_publisher(session, Some(book.publisher_id))?.completed() {
        Ok(publisher) => publisher,
        Err(stop) => return Ok(stop),
    };

    session.section("Book details")?;
    book.isbn13 = match ask_unique_isbn(session, Some(original))?.completed() {
        Ok(isbn13) => isbn13,
        Err(stop) => return Ok(stop),
    };
    book.author_id = author.id;
    book.publisher_id = publisher.id;

    let book = match ask_book_details(session, book, true)?.completed() {
        Ok(book) => book,
        Err(stop) => return Ok(stop),
    };

    match session.catalog.update_book(original, book) {
        Ok(updated) => {
            info!(isbn13 = updated.isbn13, "book updated");
            session.success("Book was successfully updated")?;
            Ok(FlowResult::Completed(updated))
        }
        Err(err) => {
            session.report_update_failure(&err)?;
            Ok(FlowResult::Absent)
        }
    }
}

pub fn delete_book(session: &mut Session) -> FlowOutcome<()> {
    session.heading("Delete book")?;

    let Prompted::Value(isbn13) = ask_existing_isbn(
        session.terminal.as_mut(),
        "Select book to delete by ISBN13",
        |isbn| session.catalog.book_exists(isbn),
    )?
    else {
        return Ok(FlowResult::Canceled);
    };

    session.warning("Deleting a book also removes it from every store inventory.")?;

    let Prompted::Value(confirmed) = confirm(
        session.terminal.as_mut(),
        "Are you sure that you want to delete the book?",
    )?
    else {
        return Ok(FlowResult::Canceled);
    };
    if !confirmed {
        session.say("Canceled deletion of book.")?;
        return Ok(FlowResult::Absent);
    }

    let deleted = session
        .catalog
        .delete_inventory_by_isbn(isbn13)
        .and_then(|_| session.catalog.delete_book(isbn13));
    match deleted {
        Ok(true) => {
            info!(isbn13, "book deleted");
            session.success("Book was successfully deleted")?;
            Ok(FlowResult::Completed(()))
        }
        Ok(false) => {
            session.error("Book no longer exists.")?;
            Ok(FlowResult::Absent)
        }
        Err(err) => {
            session.report_delete_failure(&err)?;
            Ok(FlowResult::Absent)
        }
    }
}
