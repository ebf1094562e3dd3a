mod arbitrary;
mod property_partition;
