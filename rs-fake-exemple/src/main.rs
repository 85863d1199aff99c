use rs_fake_core::dictionary::Dictionary;
use rs_fake_core::generator::Generator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Open the bundled dictionary
    // The line count is computed once and cached in "data/fa.dic.lines"
    let dictionary = Dictionary::open("./data/fa.dic")?;
    println!("Dictionary '{}' has {} lines", dictionary.name(), dictionary.lines());

    let mut generator: Generator<_> = dictionary.into_generator()?;

    // 'false' continues scanning from the last position (default, better spread)
    // 'true' restarts from the first line before every word
    generator.restart_each_call = false;

    // If 'true', read errors produce an empty word instead of an error
    // Sentences and paragraphs still fail on errors
    generator.bypass_error = false;

    // Generate 10 words
    for i in 0..10 {
        println!("Generated word {}: {}", i + 1, generator.generate()?);
    }

    // A sentence of exactly 6 words
    println!("Sentence: {}", generator.sentence(6)?);

    // A paragraph of 10 to 20 words
    println!("Paragraph: {}", generator.paragraph(10, 20)?);

    // Invalid arguments
    match generator.sentence(0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("sentence(0): {}", e),
    }
    match generator.paragraph(8, 2) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("paragraph(8, 2): {}", e),
    }

    // Restarting from the top on every call
    generator.restart_each_call = true;
    println!("Restarted word: {}", generator.generate()?);

    // Release the dictionary file
    generator.close()?;

    Ok(())
}
