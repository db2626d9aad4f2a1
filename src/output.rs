//! Output formatting module

use crate::cli::OutputFormat;
use crate::config::TollConfig;
use crate::error::Result;
use crate::types::{TransactionResult, Vehicle};

pub fn output_transaction(
    format: OutputFormat,
    identifier: &str,
    result: &TransactionResult,
) -> Result<()> {
    if format == OutputFormat::Json {
        let mut value = serde_json::to_value(result)?;
        if let Some(object) = value.as_object_mut() {
            object.insert("vehicle".to_string(), identifier.into());
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("\nToll Transaction");
    println!("================");
    println!("Vehicle:  {}", identifier);
    match result {
        TransactionResult::Accepted {
            amount,
            balance_remaining,
        } => {
            println!("Outcome:  accepted");
            println!("Charged:  {:.2}", amount);
            println!("Balance:  {:.2}", balance_remaining);
        }
        TransactionResult::RejectedUnregistered => {
            println!("Outcome:  rejected (unregistered vehicle)");
        }
        TransactionResult::RejectedInsufficientFunds { balance, required } => {
            println!("Outcome:  rejected (insufficient balance)");
            println!("Balance:  {:.2}", balance);
            println!("Required: {:.2}", required);
        }
    }
    Ok(())
}

pub fn output_vehicles(format: OutputFormat, vehicles: &[&Vehicle]) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(vehicles)?);
        return Ok(());
    }

    println!("\nRegistered Vehicles ({})", vehicles.len());
    println!("========================");
    for vehicle in vehicles {
        println!(
            "{:<10} {:<10} {:<8} {:>10.2}",
            vehicle.plate, vehicle.rfid_tag, vehicle.class, vehicle.balance
        );
    }
    Ok(())
}

pub fn output_vehicle(format: OutputFormat, vehicle: &Vehicle) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(vehicle)?);
        return Ok(());
    }

    println!("\nVehicle");
    println!("=======");
    println!("Plate:    {}", vehicle.plate);
    println!("RFID tag: {}", vehicle.rfid_tag);
    println!("Class:    {}", vehicle.class);
    println!("Balance:  {:.2}", vehicle.balance);
    Ok(())
}

pub fn output_config(format: OutputFormat, config: &TollConfig) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    print!("{}", config);
    Ok(())
}
