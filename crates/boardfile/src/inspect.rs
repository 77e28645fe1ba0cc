use boardfile_core::{
    boards::{BoardInfo, BoardIter},
    flash::PartitionType,
    pins::PinFunction,
    Descriptor,
};
use log::info;

pub fn list() -> Result<(), Box<dyn std::error::Error>> {
    for board in BoardIter::new() {
        println!("{:<10} {}", board.board_name(), board.info().name);
    }

    Ok(())
}

pub fn pins(
    board: &dyn BoardInfo,
    function: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let function = function.map(str::parse::<PinFunction>).transpose()?;
    let descriptor = Descriptor::new(board)?;

    let selected: Vec<_> = match function {
        Some(function) => descriptor.pins().with_function(function).collect(),
        None => descriptor.pins().iter().collect(),
    };

    for pin in selected {
        let functions: Vec<String> = pin.functions().keys().map(|f| f.to_string()).collect();
        println!("{:<5} {}", pin.id().to_string(), functions.join(", "));
    }

    Ok(())
}

pub fn find(board: &dyn BoardInfo, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let descriptor = Descriptor::new(board)?;
    let pin = descriptor.pins().find_strict(name)?;

    println!("{}", serde_json::to_string_pretty(pin)?);

    for layout in board.layouts() {
        if let Some(note) = layout.note(&pin.id().to_string()) {
            info!("{}: {}", layout.title, note);
        }
    }

    Ok(())
}

pub fn check(board: &dyn BoardInfo) -> Result<(), Box<dyn std::error::Error>> {
    let descriptor = Descriptor::new(board)?;
    descriptor.validate()?;

    let flash = &board.chip().flash;
    for partition in flash.partitions {
        info!(
            "{:<12} {:#08x}..{:#08x} ({} pages)",
            format!("{:?}", partition.typ),
            partition.from(flash.page_size),
            partition.to(flash.page_size),
            partition.pages
        );
    }

    let application = flash
        .partition(PartitionType::Application)
        .map(|p| p.pages)
        .unwrap_or_default();
    info!(
        "{} of {} KB reserved, {} KB ({} pages) left for the application",
        flash.reserved_bytes() / 1024,
        flash.size_kb,
        flash.flash_available_kb(),
        application
    );
    info!("{} is valid", board.info().name);

    Ok(())
}
