//! The absolute minimum: parse a document, find a node, read its data.

fn main() {
    // Parses a document from a string.
    let document = nodus::from_slice("Hello world!");

    // Finds the node with the given id.
    let hello = document.find("Hello").expect("unable to find node");

    // Prints the id of 'hello' and the value of its first data entry.
    println!(
        "{}, {}",
        hello.id_str().unwrap_or(""),
        hello.data_str_at(0).unwrap_or("")
    );
}
